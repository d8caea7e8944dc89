//! Error types for command dispatch.
//!
//! This module defines [`CliError`], the error type returned by flag parsing,
//! validation, handlers and the collaborator capabilities, plus the [`Exit`]
//! sentinel that carries an explicit process exit code.
//!
//! # Error Handling Strategy
//!
//! - Parse and validation errors abort before the handler runs
//! - Handler errors pass through unchanged (usually via `CliError::Other`)
//! - The engine is the only place that renders an error and picks an exit code

use std::fmt;

use thiserror::Error;

/// Capability of an error to choose the process exit code.
pub trait ExitCoder {
    /// The code the process should exit with.
    fn exit_code(&self) -> i32;
}

/// Sentinel error that exits the process with a specific code.
///
/// The engine never prints it; it only maps it to the carried code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("exit {code}")]
pub struct Exit {
    code: i32,
}

impl Exit {
    /// Create an exit sentinel for `code`.
    pub fn new(code: i32) -> Self {
        Self { code }
    }
}

impl ExitCoder for Exit {
    fn exit_code(&self) -> i32 {
        self.code
    }
}

/// An error type that also picks the exit code.
///
/// Implemented for every `ExitCoder` that is a thread-safe error, so a
/// domain error only needs an `ExitCoder` impl to qualify.
pub trait CodedError: ExitCoder + std::error::Error + Send + Sync + 'static {}

impl<T> CodedError for T where T: ExitCoder + std::error::Error + Send + Sync + 'static {}

/// Type-erased [`CodedError`]. Displays as the wrapped error.
///
/// Wrap a domain error in `Coded` before handing it to `anyhow` so the engine
/// can still find its exit code in the chain.
///
/// ```
/// use stdcli::error::{CliError, Coded, ExitCoder};
///
/// #[derive(Debug)]
/// struct Quota;
///
/// impl std::fmt::Display for Quota {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         f.write_str("quota exceeded")
///     }
/// }
///
/// impl std::error::Error for Quota {}
///
/// impl ExitCoder for Quota {
///     fn exit_code(&self) -> i32 {
///         42
///     }
/// }
///
/// let err: CliError = anyhow::Error::new(Coded::new(Quota)).context("upload").into();
/// assert_eq!(err.exit_code(), Some(42));
/// ```
pub struct Coded(Box<dyn CodedError>);

impl Coded {
    pub fn new(err: impl CodedError) -> Self {
        Self(Box::new(err))
    }
}

impl fmt::Debug for Coded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for Coded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for Coded {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl ExitCoder for Coded {
    fn exit_code(&self) -> i32 {
        self.0.exit_code()
    }
}

/// Shorthand for returning an [`Exit`] from a handler.
pub fn exit(code: i32) -> CliError {
    CliError::Exit(Exit::new(code))
}

/// Core error type for command execution.
#[derive(Debug, Error)]
pub enum CliError {
    /// A flag that neither the engine nor the command declares.
    #[error("unknown flag: {flag}")]
    UnknownFlag { flag: String },

    /// A value flag given as the last token with nothing to consume.
    #[error("flag needs an argument: {flag}")]
    MissingFlagValue { flag: String },

    /// A typed flag whose text could not be converted.
    #[error("invalid value \"{value}\" for flag {flag}: {reason}")]
    InvalidFlagValue {
        flag: String,
        value: String,
        reason: String,
    },

    /// Positional arguments rejected by a validator.
    #[error("{0}")]
    Validation(String),

    /// Explicit exit code requested by a handler.
    #[error(transparent)]
    Exit(#[from] Exit),

    /// A domain error that carries its own exit code.
    #[error(transparent)]
    Coded(#[from] Coded),

    /// A subprocess was requested but no executor is configured.
    #[error("no executor")]
    NoExecutor,

    /// A setting was requested but no settings store is configured.
    #[error("no settings store")]
    NoSettings,

    /// A subprocess exited unsuccessfully.
    #[error("command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// A subprocess was killed because the execution scope was cancelled.
    #[error("command cancelled: {command}")]
    Cancelled { command: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for handler-domain failures.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Wrap a domain error that picks its own exit code.
    pub fn coded(err: impl CodedError) -> Self {
        CliError::Coded(Coded::new(err))
    }

    /// The exit code carried by this error, if it is (or wraps) an exit coder.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            CliError::Exit(exit) => Some(exit.exit_code()),
            CliError::Coded(coded) => Some(coded.exit_code()),
            CliError::Other(err) => err.chain().find_map(|cause| {
                cause
                    .downcast_ref::<Exit>()
                    .map(ExitCoder::exit_code)
                    .or_else(|| cause.downcast_ref::<Coded>().map(ExitCoder::exit_code))
            }),
            _ => None,
        }
    }
}

/// Result type alias for command execution.
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_displays_code() {
        assert_eq!(Exit::new(3).to_string(), "exit 3");
        assert_eq!(exit(0).to_string(), "exit 0");
    }

    #[test]
    fn exit_carries_code() {
        assert_eq!(Exit::new(42).exit_code(), 42);
        assert_eq!(exit(42).exit_code(), Some(42));
    }

    #[test]
    fn exit_code_found_through_anyhow_context() {
        let err: CliError = anyhow::Error::new(Exit::new(7))
            .context("deploy failed")
            .into();
        assert_eq!(err.exit_code(), Some(7));
    }

    #[derive(Debug, Error)]
    #[error("quota exceeded")]
    struct Quota;

    impl ExitCoder for Quota {
        fn exit_code(&self) -> i32 {
            42
        }
    }

    #[test]
    fn custom_exit_coder_carries_code() {
        let err = CliError::coded(Quota);
        assert_eq!(err.exit_code(), Some(42));
        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[test]
    fn custom_exit_coder_found_through_anyhow_context() {
        let err: CliError = anyhow::Error::new(Coded::new(Quota))
            .context("upload failed")
            .into();
        assert_eq!(err.exit_code(), Some(42));
    }

    #[test]
    fn plain_errors_have_no_exit_code() {
        let err: CliError = anyhow::anyhow!("boom").into();
        assert_eq!(err.exit_code(), None);
        assert_eq!(CliError::NoExecutor.exit_code(), None);
    }

    #[test]
    fn unknown_flag_displays_flag() {
        let err = CliError::UnknownFlag {
            flag: "--nope".into(),
        };
        assert_eq!(err.to_string(), "unknown flag: --nope");
    }

    #[test]
    fn invalid_value_displays_value_and_reason() {
        let err = CliError::InvalidFlagValue {
            flag: "--count".into(),
            value: "abc".into(),
            reason: "invalid digit found in string".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("--count"));
        assert!(msg.contains("\"abc\""));
        assert!(msg.contains("invalid digit"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: CliError = io_err.into();
        assert!(matches!(err, CliError::Io(_)));
    }
}
