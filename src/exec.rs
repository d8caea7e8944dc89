//! Subprocess execution.
//!
//! An [`Executor`] runs external commands on behalf of handlers. Every call
//! takes the invocation's [`CancelScope`]; when the scope is cancelled the
//! child is killed and the call returns [`CliError::Cancelled`].
//!
//! - [`Executor::execute`] captures combined stdout and stderr
//! - [`Executor::run`] streams stdout to a writer, stderr to the terminal
//! - [`Executor::terminal`] hands the real terminal to the child

use std::io::{self, Read, Write};
use std::process::{Child, ChildStderr, ChildStdout, Command, Stdio};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use crate::cancel::{CancelScope, HookId};
use crate::error::{CliError, Result};

/// Capability to run external commands.
pub trait Executor: Send + Sync {
    /// Run `cmd` and return everything it wrote to stdout and stderr.
    fn execute(&self, scope: &CancelScope, cmd: &str, args: &[&str]) -> Result<Vec<u8>>;

    /// Run `cmd`, copying its stdout to `out` as it arrives.
    fn run(
        &self,
        scope: &CancelScope,
        out: &mut dyn Write,
        cmd: &str,
        args: &[&str],
    ) -> Result<()>;

    /// Run `cmd` attached to the current terminal.
    fn terminal(&self, scope: &CancelScope, cmd: &str, args: &[&str]) -> Result<()>;
}

/// Runs commands as child processes of this one.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Executor for ProcessExecutor {
    fn execute(&self, scope: &CancelScope, cmd: &str, args: &[&str]) -> Result<Vec<u8>> {
        let mut command = Command::new(cmd);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut running = Running::spawn(scope, command, describe(cmd, args))?;
        let combined = Arc::new(Mutex::new(Vec::new()));
        let readers = [
            running.stdout.take().map(|p| drain(p, Arc::clone(&combined))),
            running.stderr.take().map(|p| drain(p, Arc::clone(&combined))),
        ];

        let status = running.wait();
        for reader in readers.into_iter().flatten() {
            // A reader only ends early on a broken pipe; the status says why.
            let _ = reader.join();
        }
        status?;

        let mut output = combined.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(std::mem::take(&mut *output))
    }

    fn run(
        &self,
        scope: &CancelScope,
        out: &mut dyn Write,
        cmd: &str,
        args: &[&str],
    ) -> Result<()> {
        let mut command = Command::new(cmd);
        command
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());

        let mut running = Running::spawn(scope, command, describe(cmd, args))?;
        if let Some(mut stdout) = running.stdout.take() {
            let copied = io::copy(&mut stdout, out);
            if let Err(e) = copied {
                running.kill();
                return Err(e.into());
            }
        }
        running.wait()
    }

    fn terminal(&self, scope: &CancelScope, cmd: &str, args: &[&str]) -> Result<()> {
        let mut command = Command::new(cmd);
        command
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        Running::spawn(scope, command, describe(cmd, args))?.wait()
    }
}

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// A spawned child that is killed when the scope is cancelled. The kill hook
/// is removed from the scope once the child is dropped.
struct Running {
    command: String,
    scope: CancelScope,
    hook: HookId,
    child: Arc<Mutex<Child>>,
    stdout: Option<ChildStdout>,
    stderr: Option<ChildStderr>,
}

impl Running {
    fn spawn(scope: &CancelScope, mut command: Command, description: String) -> Result<Self> {
        if scope.is_cancelled() {
            return Err(CliError::Cancelled {
                command: description,
            });
        }

        tracing::debug!("spawning: {}", description);
        let mut child = command.spawn()?;
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let child = Arc::new(Mutex::new(child));

        let target = Arc::clone(&child);
        let hook = scope.on_cancel(move || {
            let mut child = target.lock().unwrap_or_else(PoisonError::into_inner);
            // Already exited children report an error here; nothing to do.
            let _ = child.kill();
        });

        Ok(Self {
            command: description,
            scope: scope.clone(),
            hook,
            child,
            stdout,
            stderr,
        })
    }

    fn kill(&self) {
        let _ = self
            .child
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .kill();
    }

    /// Poll until the child exits, then map its status.
    fn wait(self) -> Result<()> {
        loop {
            let status = self
                .child
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .try_wait()?;

            if let Some(status) = status {
                if self.scope.is_cancelled() {
                    return Err(CliError::Cancelled {
                        command: self.command.clone(),
                    });
                }
                if !status.success() {
                    return Err(CliError::CommandFailed {
                        command: self.command.clone(),
                        code: status.code(),
                    });
                }
                return Ok(());
            }

            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Drop for Running {
    fn drop(&mut self) {
        self.scope.remove_hook(self.hook);
    }
}

fn drain<R>(mut pipe: R, into: Arc<Mutex<Vec<u8>>>) -> thread::JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut chunk = [0u8; 4096];
        loop {
            match pipe.read(&mut chunk) {
                Ok(0) | Err(_) => break,
                Ok(n) => into
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .extend_from_slice(&chunk[..n]),
            }
        }
    })
}

fn describe(cmd: &str, args: &[&str]) -> String {
    std::iter::once(cmd)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn execute_captures_stdout() {
        let scope = CancelScope::new();
        let out = ProcessExecutor.execute(&scope, "echo", &["hello"]).unwrap();
        assert_eq!(out, b"hello\n");
    }

    #[test]
    fn execute_captures_stderr_too() {
        let scope = CancelScope::new();
        let out = ProcessExecutor
            .execute(&scope, "sh", &["-c", "echo oops >&2"])
            .unwrap();
        assert_eq!(String::from_utf8_lossy(&out), "oops\n");
    }

    #[test]
    fn non_zero_exit_is_command_failed() {
        let scope = CancelScope::new();
        let err = ProcessExecutor
            .execute(&scope, "sh", &["-c", "exit 3"])
            .unwrap_err();
        match err {
            CliError::CommandFailed { command, code } => {
                assert_eq!(command, "sh -c exit 3");
                assert_eq!(code, Some(3));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn missing_binary_is_io_error() {
        let scope = CancelScope::new();
        let err = ProcessExecutor
            .execute(&scope, "definitely-not-a-real-binary-xyz", &[])
            .unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }

    #[test]
    fn run_streams_stdout() {
        let scope = CancelScope::new();
        let mut out = Vec::new();
        ProcessExecutor
            .run(&scope, &mut out, "printf", &["a\\nb\\n"])
            .unwrap();
        assert_eq!(out, b"a\nb\n");
    }

    #[test]
    fn cancelled_scope_refuses_to_spawn() {
        let scope = CancelScope::new();
        scope.cancel();
        let err = ProcessExecutor.execute(&scope, "echo", &["x"]).unwrap_err();
        assert!(matches!(err, CliError::Cancelled { .. }));
    }

    #[test]
    fn cancel_kills_running_child() {
        let scope = CancelScope::new();
        let canceller = scope.clone();
        let started = Instant::now();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            canceller.cancel();
        });

        let err = ProcessExecutor
            .terminal(&scope, "sleep", &["10"])
            .unwrap_err();
        assert!(matches!(err, CliError::Cancelled { .. }));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn finished_children_release_their_kill_hook() {
        let scope = CancelScope::new();
        for _ in 0..3 {
            ProcessExecutor.execute(&scope, "echo", &["x"]).unwrap();
        }
        ProcessExecutor
            .execute(&scope, "sh", &["-c", "exit 1"])
            .unwrap_err();
        assert_eq!(scope.pending_hooks(), 0);
    }

    #[test]
    fn describe_joins_command_and_args() {
        assert_eq!(describe("git", &["status", "-s"]), "git status -s");
        assert_eq!(describe("ls", &[]), "ls");
    }
}
