//! Typed flag descriptors.

use std::fmt;
use std::time::Duration;

use crate::error::{CliError, Result};

use super::duration::parse_duration;

/// The value domain of a flag. Fixed when the flag is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagKind {
    Bool,
    Duration,
    Int,
    String,
}

impl fmt::Display for FlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlagKind::Bool => "bool",
            FlagKind::Duration => "duration",
            FlagKind::Int => "int",
            FlagKind::String => "string",
        };
        f.write_str(name)
    }
}

/// A parsed or default flag value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    Bool(bool),
    Duration(Duration),
    Int(i64),
    String(String),
}

impl FlagValue {
    /// The kind this value belongs to.
    pub fn kind(&self) -> FlagKind {
        match self {
            FlagValue::Bool(_) => FlagKind::Bool,
            FlagValue::Duration(_) => FlagKind::Duration,
            FlagValue::Int(_) => FlagKind::Int,
            FlagValue::String(_) => FlagKind::String,
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagValue::Bool(v) => write!(f, "{}", v),
            FlagValue::Duration(v) => write!(f, "{:?}", v),
            FlagValue::Int(v) => write!(f, "{}", v),
            FlagValue::String(v) => f.write_str(v),
        }
    }
}

impl From<bool> for FlagValue {
    fn from(v: bool) -> Self {
        FlagValue::Bool(v)
    }
}

impl From<Duration> for FlagValue {
    fn from(v: Duration) -> Self {
        FlagValue::Duration(v)
    }
}

impl From<i64> for FlagValue {
    fn from(v: i64) -> Self {
        FlagValue::Int(v)
    }
}

impl From<i32> for FlagValue {
    fn from(v: i32) -> Self {
        FlagValue::Int(i64::from(v))
    }
}

impl From<&str> for FlagValue {
    fn from(v: &str) -> Self {
        FlagValue::String(v.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(v: String) -> Self {
        FlagValue::String(v)
    }
}

/// A flag descriptor: name, optional one-letter short form, kind, default and
/// the value parsed for the current invocation.
///
/// # Example
///
/// ```
/// use stdcli::flags::{Flag, FlagKind, FlagValue};
///
/// let mut flag = Flag::int("count", "number of items").short('c').default_value(10i64);
/// assert_eq!(flag.kind(), FlagKind::Int);
///
/// flag.set("42").unwrap();
/// assert_eq!(flag.value(), Some(&FlagValue::Int(42)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag {
    name: String,
    short: Option<char>,
    description: String,
    kind: FlagKind,
    default: Option<FlagValue>,
    value: Option<FlagValue>,
}

impl Flag {
    fn new(kind: FlagKind, name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            short: None,
            description: description.to_string(),
            kind,
            default: None,
            value: None,
        }
    }

    /// Create a boolean flag. `--name` alone sets it to `true`.
    pub fn bool(name: &str, description: &str) -> Self {
        Self::new(FlagKind::Bool, name, description)
    }

    /// Create a duration flag accepting literals like `5s` or `1h30m`.
    pub fn duration(name: &str, description: &str) -> Self {
        Self::new(FlagKind::Duration, name, description)
    }

    /// Create an integer flag.
    pub fn int(name: &str, description: &str) -> Self {
        Self::new(FlagKind::Int, name, description)
    }

    /// Create a string flag.
    pub fn string(name: &str, description: &str) -> Self {
        Self::new(FlagKind::String, name, description)
    }

    /// Set the one-letter short form (`-x`).
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Set the value reported when the flag is not given.
    ///
    /// A default of a different kind is kept but never reported by the typed
    /// accessors.
    pub fn default_value(mut self, value: impl Into<FlagValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_name(&self) -> Option<char> {
        self.short
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> FlagKind {
        self.kind
    }

    pub fn default(&self) -> Option<&FlagValue> {
        self.default.as_ref()
    }

    /// The value parsed for this invocation, if any.
    pub fn value(&self) -> Option<&FlagValue> {
        self.value.as_ref()
    }

    /// Parsed value, falling back to the default.
    pub fn effective(&self) -> Option<&FlagValue> {
        self.value.as_ref().or(self.default.as_ref())
    }

    pub fn is_bool(&self) -> bool {
        self.kind == FlagKind::Bool
    }

    /// Coerce `raw` according to the flag's kind and store it.
    ///
    /// Bool flags are `true` only for the exact text `"true"`; everything
    /// else, including `"false"`, yields `false`.
    pub fn set(&mut self, raw: &str) -> Result<()> {
        let value = match self.kind {
            FlagKind::Bool => FlagValue::Bool(raw == "true"),
            FlagKind::Duration => {
                FlagValue::Duration(parse_duration(raw).map_err(|e| self.invalid(raw, e))?)
            }
            FlagKind::Int => FlagValue::Int(raw.parse().map_err(|e| self.invalid(raw, e))?),
            FlagKind::String => FlagValue::String(raw.to_string()),
        };
        self.value = Some(value);
        Ok(())
    }

    fn invalid(&self, raw: &str, reason: impl fmt::Display) -> CliError {
        CliError::InvalidFlagValue {
            flag: format!("--{}", self.name),
            value: raw.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Usage fragment for help output: `-c --count <count>`.
    ///
    /// Flags without a short form get three spaces in its place so long
    /// names line up.
    pub fn usage(&self) -> String {
        let short = match self.short {
            Some(c) => format!("-{}", c),
            None => "  ".to_string(),
        };
        match self.kind {
            FlagKind::Bool => format!("{} --{}", short, self.name),
            _ => format!("{} --{} <{}>", short, self.name, self.name),
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(v) => write!(f, "{}: {}", self.name, v),
            None => write!(f, "{}: <unset>", self.name),
        }
    }
}
