//! The request-scoped view a handler gets of one invocation.

use std::time::Duration;

use crate::cancel::CancelScope;
use crate::error::{CliError, Result};
use crate::exec::Executor;
use crate::flags::FlagSet;
use crate::layout::{Columns, Info, OutputFormat, Table};
use crate::render::Writer;
use crate::settings::Settings;

use super::command::Command;
use super::engine::Engine;

/// Arguments, flags and capabilities for one handler call.
///
/// Output goes through the engine's [`Writer`], so markup in text passed to
/// [`write`](Context::write) is rendered. Subprocesses and settings are only
/// available when the engine has an executor or a settings store.
#[derive(Debug)]
pub struct Context<'a> {
    engine: &'a Engine,
    command: &'a Command,
    args: Vec<String>,
    flags: FlagSet,
    scope: &'a CancelScope,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        engine: &'a Engine,
        command: &'a Command,
        args: Vec<String>,
        flags: FlagSet,
        scope: &'a CancelScope,
    ) -> Self {
        Self {
            engine,
            command,
            args,
            flags,
            scope,
        }
    }

    /// Positional argument `i`, or `""` when there are fewer arguments.
    pub fn arg(&self, i: usize) -> &str {
        self.args.get(i).map_or("", String::as_str)
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Engine-wide and command flags with their parsed values.
    pub fn flags(&self) -> &FlagSet {
        &self.flags
    }

    /// `Bool` flag shortcut.
    pub fn bool(&self, name: &str) -> bool {
        self.flags.bool(name)
    }

    /// `Int` flag shortcut.
    pub fn int(&self, name: &str) -> i64 {
        self.flags.int(name)
    }

    /// `String` flag shortcut.
    pub fn string(&self, name: &str) -> String {
        self.flags.string(name)
    }

    /// `Duration` flag shortcut.
    pub fn duration(&self, name: &str) -> Duration {
        self.flags.duration(name)
    }

    pub fn command(&self) -> &'a Command {
        self.command
    }

    pub fn engine(&self) -> &'a Engine {
        self.engine
    }

    pub fn version(&self) -> &'a str {
        self.engine.version()
    }

    pub fn writer(&self) -> &'a Writer {
        self.engine.writer()
    }

    /// Format selected by the `output` flag.
    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::from_flags(&self.flags)
    }

    /// Render markup and write it to stdout.
    pub fn write(&self, text: &str) -> Result<()> {
        self.writer().write(text)?;
        Ok(())
    }

    pub fn writeln(&self, text: &str) -> Result<()> {
        self.write(&format!("{}\n", text))
    }

    pub fn table<I, S>(&self, columns: I) -> Table<'a>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Table::new(self.writer(), self.output_format(), columns)
    }

    pub fn columns(&self) -> Columns<'a> {
        Columns::new(self.writer())
    }

    pub fn info(&self) -> Info<'a> {
        Info::new(self.writer(), self.output_format())
    }

    fn executor(&self) -> Result<&'a dyn Executor> {
        self.engine.executor().ok_or(CliError::NoExecutor)
    }

    /// Run a command and return its combined output.
    pub fn execute(&self, cmd: &str, args: &[&str]) -> Result<Vec<u8>> {
        self.executor()?.execute(self.scope, cmd, args)
    }

    /// Run a command, streaming its stdout to ours.
    pub fn run(&self, cmd: &str, args: &[&str]) -> Result<()> {
        let mut out = self.writer().plain();
        self.executor()?.run(self.scope, &mut out, cmd, args)
    }

    /// Run a command attached to the terminal.
    pub fn terminal(&self, cmd: &str, args: &[&str]) -> Result<()> {
        self.executor()?.terminal(self.scope, cmd, args)
    }

    fn settings(&self) -> Result<&'a dyn Settings> {
        self.engine.settings().ok_or(CliError::NoSettings)
    }

    pub fn setting_read(&self, name: &str) -> Result<Option<String>> {
        self.settings()?.read(name)
    }

    pub fn setting_write(&self, name: &str, value: &str) -> Result<()> {
        self.settings()?.write(name, value)
    }

    pub fn setting_delete(&self, name: &str) -> Result<()> {
        self.settings()?.delete(name)
    }

    /// Whether stdin is an interactive terminal.
    pub fn is_terminal(&self) -> bool {
        self.engine.reader().is_terminal()
    }

    /// Read a line from stdin without echo.
    pub fn read_secret(&self) -> Result<String> {
        Ok(self.engine.reader().read_secret()?)
    }

    /// Run `hook` in the background if the invocation is interrupted.
    pub fn cleanup<F>(&self, hook: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.scope.on_cancel(hook);
    }

    pub fn scope(&self) -> &'a CancelScope {
        self.scope
    }

    pub fn is_cancelled(&self) -> bool {
        self.scope.is_cancelled()
    }
}
