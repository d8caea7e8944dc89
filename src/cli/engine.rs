//! Command registry and dispatch.
//!
//! The [`Engine`] owns every registered [`Command`], the global flags, the
//! output [`Writer`] and the optional collaborators handlers reach through
//! their [`Context`]. Dispatch works in three steps:
//!
//! 1. `-v`/`--version` as the first argument prints the version and stops
//! 2. The command whose path is the longest exact prefix of the arguments
//!    wins, the first registered on ties, and `help` when nothing matches
//! 3. The command's result is mapped to a process exit code

use std::fmt;
use std::sync::Arc;

use crate::cancel::{self, CancelScope};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::exec::{Executor, ProcessExecutor};
use crate::flags::Flag;
use crate::render::Writer;
use crate::settings::{FileSettings, Settings};
use crate::terminal::{Reader, StdinReader};
use crate::validate;

use super::command::{Command, CommandOptions, Outcome};
use super::context::Context;
use super::help;

/// Exit code for any failure that does not carry its own.
pub const FAILURE: i32 = 1;

/// A command-line program: commands, global flags and output.
pub struct Engine {
    config: EngineConfig,
    writer: Writer,
    commands: Vec<Command>,
    flags: Vec<Flag>,
    executor: Option<Box<dyn Executor>>,
    settings: Option<Box<dyn Settings>>,
    reader: Box<dyn Reader>,
}

impl Engine {
    /// An engine writing to the process stdout/stderr.
    pub fn new(config: EngineConfig) -> Self {
        let writer = Writer::stdio(&config);
        Self::with_writer(config, writer)
    }

    /// An engine writing through `writer`.
    ///
    /// Subprocesses run as child processes, settings live under the
    /// configured settings directory (if any) and secrets are read from
    /// stdin. The built-in `help` command is registered first, which makes
    /// it the fallback for unmatched arguments.
    pub fn with_writer(config: EngineConfig, writer: Writer) -> Self {
        let settings = config
            .settings_dir
            .clone()
            .map(|dir| Box::new(FileSettings::new(dir)) as Box<dyn Settings>);

        let mut engine = Self {
            config,
            writer,
            commands: Vec::new(),
            flags: Vec::new(),
            executor: Some(Box::new(ProcessExecutor::new())),
            settings,
            reader: Box::new(StdinReader),
        };

        engine.add_command(Command::new(
            "help",
            "list commands",
            Arc::new(help::run),
            CommandOptions::new()
                .usage("[command]")
                .validate(validate::args_between(0, 1)),
        ));
        engine
    }

    pub fn with_executor(mut self, executor: impl Executor + 'static) -> Self {
        self.executor = Some(Box::new(executor));
        self
    }

    /// Drop the executor; subprocess calls then fail with `NoExecutor`.
    pub fn without_executor(mut self) -> Self {
        self.executor = None;
        self
    }

    pub fn with_settings(mut self, settings: impl Settings + 'static) -> Self {
        self.settings = Some(Box::new(settings));
        self
    }

    /// Drop the settings store; setting calls then fail with `NoSettings`.
    pub fn without_settings(mut self) -> Self {
        self.settings = None;
        self
    }

    pub fn with_reader(mut self, reader: impl Reader + 'static) -> Self {
        self.reader = Box::new(reader);
        self
    }

    /// Register a command. `path` is split on whitespace.
    ///
    /// Registration never replaces an existing command; overlapping paths
    /// are resolved by longest match at dispatch time.
    pub fn command<F>(
        &mut self,
        path: &str,
        description: &str,
        handler: F,
        options: CommandOptions,
    ) where
        F: Fn(&Context<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.add_command(Command::new(path, description, Arc::new(handler), options));
    }

    pub fn add_command(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Add a flag accepted by every command.
    pub fn global_flag(&mut self, flag: Flag) {
        self.flags.push(flag);
    }

    pub fn global_flags(&self) -> &[Flag] {
        &self.flags
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn version(&self) -> &str {
        &self.config.version
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn writer(&self) -> &Writer {
        &self.writer
    }

    pub fn executor(&self) -> Option<&dyn Executor> {
        self.executor.as_deref()
    }

    pub fn settings(&self) -> Option<&dyn Settings> {
        self.settings.as_deref()
    }

    pub fn reader(&self) -> &dyn Reader {
        self.reader.as_ref()
    }

    /// The most specific command matching `args`, with the arguments left
    /// after its path. `None` when no command matches.
    pub fn find<'a>(&self, args: &'a [String]) -> Option<(&Command, &'a [String])> {
        let mut best: Option<(&Command, &'a [String])> = None;
        for command in &self.commands {
            if let Some(rest) = command.matches(args) {
                let longer = best.map_or(true, |(b, _)| command.path().len() > b.path().len());
                if longer {
                    best = Some((command, rest));
                }
            }
        }
        best
    }

    /// Like [`find`](Engine::find), falling back to the first registered
    /// command (`help`) with no arguments.
    pub fn resolve<'a>(&self, args: &'a [String]) -> (&Command, &'a [String]) {
        // `help` is registered by the constructor, so index 0 always exists.
        self.find(args)
            .unwrap_or_else(|| (&self.commands[0], &args[..0]))
    }

    /// Dispatch `args` (without the program name) and return the exit code.
    ///
    /// An interrupt while the command runs cancels its scope once; a second
    /// interrupt terminates the process.
    pub fn execute(&self, args: &[String]) -> i32 {
        let scope = CancelScope::new();
        let _armed = cancel::arm(&scope);
        self.execute_in(&scope, args)
    }

    /// Dispatch `args` within an existing scope.
    pub fn execute_in(&self, scope: &CancelScope, args: &[String]) -> i32 {
        if let Some("-v" | "--version") = args.first().map(String::as_str) {
            let line = format!("{}\n", self.config.version);
            if let Err(e) = self.writer.write_plain(line.as_bytes()) {
                tracing::warn!("could not write version: {}", e);
            }
            return 0;
        }

        let (command, rest) = self.resolve(args);
        tracing::debug!("resolved {:?} with args {:?}", command.path(), rest);

        let code = match command.invoke(self, scope, rest) {
            Ok(Outcome::Completed | Outcome::HelpShown) => 0,
            Err(err) => match err.exit_code() {
                Some(code) => code,
                None => {
                    if let Err(e) = self.writer.error(&err) {
                        tracing::warn!("could not write error: {}", e);
                    }
                    FAILURE
                }
            },
        };
        tracing::debug!("exit code {}", code);
        code
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("commands", &self.commands)
            .field("flags", &self.flags)
            .field("executor", &self.executor.is_some())
            .field("settings", &self.settings.is_some())
            .finish_non_exhaustive()
    }
}
