//! Positional-argument validators.
//!
//! A [`Validator`] runs after flag parsing and before the handler. A failure
//! stops the handler from running and is reported like a handler error.
//!
//! # Example
//!
//! ```
//! use stdcli::validate::{args_between, Validator};
//!
//! let check: Validator = args_between(1, 2);
//! assert!(check(&["app".to_string()]).is_ok());
//! let none: Vec<String> = Vec::new();
//! assert!(check(&none).is_err());
//! ```

use std::sync::Arc;

use crate::error::{CliError, Result};

/// Predicate over the positional arguments of one invocation.
pub type Validator = Arc<dyn Fn(&[String]) -> Result<()> + Send + Sync>;

/// Exactly `num` arguments.
pub fn args(num: usize) -> Validator {
    Arc::new(move |args: &[String]| {
        if args.len() != num {
            return Err(CliError::Validation(format!(
                "{} {} required",
                num,
                plural("arg", num)
            )));
        }
        Ok(())
    })
}

/// At least `min` arguments.
pub fn args_min(min: usize) -> Validator {
    Arc::new(move |args: &[String]| {
        if args.len() < min {
            return Err(CliError::Validation(format!(
                "at least {} {} required",
                min,
                plural("arg", min)
            )));
        }
        Ok(())
    })
}

/// At most `max` arguments.
pub fn args_max(max: usize) -> Validator {
    Arc::new(move |args: &[String]| {
        if args.len() > max {
            return Err(CliError::Validation(format!(
                "no more than {} {} expected",
                max,
                plural("arg", max)
            )));
        }
        Ok(())
    })
}

/// Between `min` and `max` arguments, inclusive. The lower bound is checked
/// first.
pub fn args_between(min: usize, max: usize) -> Validator {
    all([args_min(min), args_max(max)])
}

/// Run validators in order, stopping at the first failure.
pub fn all(validators: impl IntoIterator<Item = Validator>) -> Validator {
    let validators: Vec<Validator> = validators.into_iter().collect();
    Arc::new(move |args: &[String]| validators.iter().try_for_each(|v| v(args)))
}

fn plural(noun: &str, num: usize) -> String {
    if num == 1 {
        noun.to_string()
    } else {
        format!("{}s", noun)
    }
}
