//! Command registration and dispatch.
//!
//! # Architecture
//!
//! - [`engine`] - the registry, longest-prefix resolution and exit codes
//! - [`command`] - one registered command and its flag/validation pipeline
//! - [`context`] - what a handler sees of its invocation
//! - [`help`] - the built-in command listing and help pages

pub mod command;
pub mod context;
pub mod engine;
pub mod help;

pub use command::{Command, CommandDefinitions, CommandOptions, Handler, Outcome};
pub use context::Context;
pub use engine::{Engine, FAILURE};
