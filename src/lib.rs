//! stdcli - a toolkit for building command-line programs.
//!
//! Programs register commands as whitespace-separated token paths. The
//! engine resolves argv to the most specific command, binds typed flags,
//! validates positional arguments and runs the handler. Handlers write
//! through a small markup vocabulary (`<h1>`, `<value>`, `<id>`, ...) that is
//! rendered to ANSI colors or stripped to plain text.
//!
//! # Modules
//!
//! - [`cli`] - Engine, commands, handler context and help output
//! - [`flags`] - Flag descriptors, flag sets and the argv parser
//! - [`validate`] - Positional argument validators
//! - [`render`] - Markup rendering, stripping and the output writer
//! - [`layout`] - Columns, tables and info blocks (text or JSON)
//! - [`cancel`] - Per-run cancellation scope and interrupt handling
//! - [`exec`] - Subprocess execution
//! - [`settings`] - Persisted per-user settings
//! - [`terminal`] - Terminal detection and secret input
//! - [`config`] - Engine configuration
//! - [`error`] - Error types and result aliases
//!
//! # Example
//!
//! ```
//! use stdcli::cancel::CancelScope;
//! use stdcli::cli::{CommandOptions, Engine};
//! use stdcli::config::EngineConfig;
//! use stdcli::flags::Flag;
//! use stdcli::render::{TagTable, Writer};
//! use stdcli::validate;
//!
//! let (writer, out, _) = Writer::capture(TagTable::standard());
//! let mut engine = Engine::with_writer(EngineConfig::new("app", "1.0.0"), writer);
//!
//! engine.command(
//!     "greet",
//!     "say hello",
//!     |ctx| ctx.writeln(&format!("<h1>hello</h1> <value>{}</value>", ctx.arg(0))),
//!     CommandOptions::new()
//!         .flag(Flag::bool("loud", "shout").short('l'))
//!         .validate(validate::args(1)),
//! );
//!
//! let args: Vec<String> = vec!["greet".into(), "world".into()];
//! let code = engine.execute_in(&CancelScope::new(), &args);
//!
//! assert_eq!(code, 0);
//! assert_eq!(out.contents(), "hello world\n");
//! ```

pub mod cancel;
pub mod cli;
pub mod config;
pub mod error;
pub mod exec;
pub mod flags;
pub mod layout;
pub mod render;
pub mod settings;
pub mod terminal;
pub mod validate;

pub use cli::{Command, CommandDefinitions, CommandOptions, Context, Engine};
pub use config::EngineConfig;
pub use error::{exit, CliError, Coded, CodedError, Exit, ExitCoder, Result};
pub use flags::{Flag, FlagSet};
