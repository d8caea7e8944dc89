//! Registered commands and their invocation.

use std::fmt;
use std::sync::Arc;

use crate::cancel::CancelScope;
use crate::error::Result;
use crate::flags::{parse, Flag, FlagSet, Parsed};
use crate::validate::Validator;

use super::context::Context;
use super::engine::Engine;
use super::help;

/// Business logic of a command.
pub type Handler = Arc<dyn Fn(&Context<'_>) -> Result<()> + Send + Sync>;

/// Optional parts of a command registration.
#[derive(Clone, Default)]
pub struct CommandOptions {
    pub flags: Vec<Flag>,
    pub invisible: bool,
    pub usage: String,
    pub validate: Option<Validator>,
}

impl CommandOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flag(mut self, flag: Flag) -> Self {
        self.flags.push(flag);
        self
    }

    /// Hide the command from the help listing. It still dispatches.
    pub fn invisible(mut self) -> Self {
        self.invisible = true;
        self
    }

    /// Argument synopsis shown after the command path, e.g. `<name> [value]`.
    pub fn usage(mut self, usage: &str) -> Self {
        self.usage = usage.to_string();
        self
    }

    pub fn validate(mut self, validator: Validator) -> Self {
        self.validate = Some(validator);
        self
    }
}

impl fmt::Debug for CommandOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandOptions")
            .field("flags", &self.flags)
            .field("invisible", &self.invisible)
            .field("usage", &self.usage)
            .field("validate", &self.validate.is_some())
            .finish()
    }
}

/// What an invocation did when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The handler ran to completion.
    Completed,
    /// Help was requested and printed; the handler did not run.
    HelpShown,
}

/// A token path bound to a handler.
pub struct Command {
    path: Vec<String>,
    description: String,
    usage: String,
    flags: Vec<Flag>,
    validator: Option<Validator>,
    handler: Handler,
    invisible: bool,
}

impl Command {
    /// Build a command. `path` is split on whitespace.
    pub fn new(path: &str, description: &str, handler: Handler, options: CommandOptions) -> Self {
        Self {
            path: path.split_whitespace().map(str::to_string).collect(),
            description: description.to_string(),
            usage: options.usage,
            flags: options.flags,
            validator: options.validate,
            handler,
            invisible: options.invisible,
        }
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// The command's own flags, without the engine's global flags.
    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    pub fn is_invisible(&self) -> bool {
        self.invisible
    }

    /// `program path...`, as typed by a user.
    pub fn full_command(&self, program: &str) -> String {
        let mut full = program.to_string();
        for token in &self.path {
            full.push(' ');
            full.push_str(token);
        }
        full
    }

    /// If `args` starts with this command's path, the arguments after it.
    ///
    /// Tokens are compared exactly. A command with an empty path matches
    /// nothing.
    pub fn matches<'a>(&self, args: &'a [String]) -> Option<&'a [String]> {
        if self.path.is_empty() || args.len() < self.path.len() {
            return None;
        }
        if args.iter().zip(&self.path).all(|(arg, token)| arg == token) {
            Some(&args[self.path.len()..])
        } else {
            None
        }
    }

    /// Parse flags, validate, and run the handler.
    ///
    /// Parse and validation errors are returned before the handler runs.
    /// A help request prints this command's help instead.
    pub fn invoke(
        &self,
        engine: &Engine,
        scope: &CancelScope,
        args: &[String],
    ) -> Result<Outcome> {
        let mut flags = FlagSet::effective(engine.global_flags(), &self.flags);

        let args = match parse(&mut flags, args)? {
            Parsed::Help => {
                tracing::debug!("help requested for {:?}", self.path);
                help::command_help(engine, self)?;
                return Ok(Outcome::HelpShown);
            }
            Parsed::Args(args) => args,
        };

        if let Some(validate) = &self.validator {
            validate(args.as_slice())?;
        }

        let context = Context::new(engine, self, args, flags, scope);
        (self.handler)(&context)?;
        Ok(Outcome::Completed)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("path", &self.path)
            .field("description", &self.description)
            .field("usage", &self.usage)
            .field("flags", &self.flags)
            .field("invisible", &self.invisible)
            .finish_non_exhaustive()
    }
}

struct Definition {
    path: String,
    description: String,
    handler: Handler,
    options: CommandOptions,
}

/// Registrations collected ahead of time, for example one list per module,
/// and applied to an engine later in the order they were registered.
#[derive(Default)]
pub struct CommandDefinitions {
    definitions: Vec<Definition>,
}

impl CommandDefinitions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(
        &mut self,
        path: &str,
        description: &str,
        handler: F,
        options: CommandOptions,
    ) where
        F: Fn(&Context<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.definitions.push(Definition {
            path: path.to_string(),
            description: description.to_string(),
            handler: Arc::new(handler),
            options,
        });
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Register every definition on `engine`.
    pub fn apply(&self, engine: &mut Engine) {
        for d in &self.definitions {
            engine.add_command(Command::new(
                &d.path,
                &d.description,
                Arc::clone(&d.handler),
                d.options.clone(),
            ));
        }
    }
}

impl fmt::Debug for CommandDefinitions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.definitions.iter().map(|d| &d.path))
            .finish()
    }
}
