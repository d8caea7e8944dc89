//! Typed flags and argument parsing.
//!
//! - [`Flag`] - a typed flag descriptor with default and parsed value
//! - [`FlagSet`] - the effective flags of one invocation, with typed accessors
//! - [`parse`] - argv tokens to positional arguments plus flag values
//! - [`parse_duration`] - compound duration literals (`1h30m`, `250ms`)

pub mod duration;
pub mod flag;
pub mod parser;
pub mod set;

pub use duration::{parse_duration, DurationError};
pub use flag::{Flag, FlagKind, FlagValue};
pub use parser::{parse, Parsed};
pub use set::FlagSet;
