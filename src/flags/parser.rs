//! Turns a raw token sequence into positional arguments and flag values.
//!
//! A `clap::Command` is built at runtime from the effective [`FlagSet`], so
//! the accepted forms are clap's:
//! - `--name`, `--name=value`, `--name value`
//! - `-x`, `-xvalue`, `-x=value`, `-x value`, and clusters of bool
//!   shorthands such as `-abc`
//! - `--` ends flag parsing; everything after it is positional
//!
//! Bool flags take an optional value only through `=` (`--force=false`), so
//! `--force file` leaves `file` positional. Flags and positional arguments may
//! be interleaved. `--help` and `-h` produce [`Parsed::Help`] unless a flag
//! claims those names. Matched values are coerced by [`Flag::set`].

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Arg, ArgAction, ArgMatches};

use crate::error::{CliError, Result};

use super::flag::Flag;
use super::set::FlagSet;

const HELP_ID: &str = "__help";
const ARGS_ID: &str = "__args";

/// Outcome of a successful parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    /// Positional arguments left after flags were consumed.
    Args(Vec<String>),
    /// Help was requested; the handler must not run.
    Help,
}

/// Parse `args` into `flags`, returning the positional arguments.
pub fn parse(flags: &mut FlagSet, args: &[String]) -> Result<Parsed> {
    let (command, registered) = build(flags);
    let matches = command
        .try_get_matches_from(args)
        .map_err(parse_error)?;

    if matches
        .try_get_one::<bool>(HELP_ID)
        .ok()
        .flatten()
        .copied()
        .unwrap_or(false)
    {
        return Ok(Parsed::Help);
    }

    for name in &registered {
        if let Some(raw) = last_value(&matches, name) {
            if let Some(flag) = flags.get_mut(name) {
                flag.set(&raw)?;
            }
        }
    }

    let positional = matches
        .get_many::<String>(ARGS_ID)
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    Ok(Parsed::Args(positional))
}

/// Build the clap command for `flags`. Returns it along with the names that
/// were registered; later flags reusing a name or shorthand are skipped so
/// the first one wins, as with [`FlagSet::get`].
fn build(flags: &FlagSet) -> (clap::Command, Vec<String>) {
    let mut command = clap::Command::new("command")
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .args_override_self(true);

    let mut registered: Vec<String> = Vec::new();
    let mut shorts: Vec<char> = Vec::new();

    for flag in flags {
        if registered.iter().any(|n| n == flag.name()) {
            continue;
        }
        let short = flag.short_name().filter(|c| !shorts.contains(c));
        if let Some(c) = short {
            shorts.push(c);
        }
        command = command.arg(flag_arg(flag, short));
        registered.push(flag.name().to_string());
    }

    let claims_long = registered.iter().any(|n| n == "help");
    let claims_short = shorts.contains(&'h');
    if !claims_long || !claims_short {
        let mut help = Arg::new(HELP_ID).action(ArgAction::SetTrue);
        if !claims_long {
            help = help.long("help");
        }
        if !claims_short {
            help = help.short('h');
        }
        command = command.arg(help);
    }

    command = command.arg(
        Arg::new(ARGS_ID)
            .action(ArgAction::Append)
            .num_args(1..),
    );

    (command, registered)
}

fn flag_arg(flag: &Flag, short: Option<char>) -> Arg {
    let mut arg = Arg::new(flag.name().to_string())
        .long(flag.name().to_string())
        .value_name(flag.name().to_string())
        .action(ArgAction::Set);
    if let Some(c) = short {
        arg = arg.short(c);
    }

    if flag.is_bool() {
        arg.num_args(0..=1)
            .default_missing_value("true")
            .require_equals(true)
    } else {
        arg.num_args(1).allow_hyphen_values(true)
    }
}

fn last_value(matches: &ArgMatches, name: &str) -> Option<String> {
    matches
        .try_get_many::<String>(name)
        .ok()
        .flatten()
        .and_then(|values| values.last().cloned())
}

/// Reduce clap's error to the flag it names.
fn parse_error(err: clap::Error) -> CliError {
    let flag = match err.get(ContextKind::InvalidArg) {
        Some(ContextValue::String(arg)) => arg
            .split_whitespace()
            .next()
            .unwrap_or(arg.as_str())
            .to_string(),
        _ => String::new(),
    };

    match err.kind() {
        ErrorKind::UnknownArgument => CliError::UnknownFlag { flag },
        ErrorKind::InvalidValue | ErrorKind::NoEquals | ErrorKind::WrongNumberOfValues => {
            CliError::MissingFlagValue { flag }
        }
        _ => CliError::Other(anyhow::Error::new(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::FlagValue;
    use std::time::Duration;

    fn flags() -> FlagSet {
        FlagSet::new(vec![
            Flag::bool("verbose", "").short('v'),
            Flag::bool("force", "").short('f'),
            Flag::string("name", "").short('n'),
            Flag::int("count", "").short('c'),
            Flag::duration("timeout", "").short('t'),
        ])
    }

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    fn positional(parsed: Parsed) -> Vec<String> {
        match parsed {
            Parsed::Args(args) => args,
            Parsed::Help => panic!("unexpected help request"),
        }
    }

    #[test]
    fn long_forms() {
        let mut set = flags();
        let parsed = parse(
            &mut set,
            &args(&["--name=alpha", "--count", "3", "--verbose", "pos"]),
        )
        .unwrap();
        assert_eq!(positional(parsed), vec!["pos"]);
        assert_eq!(set.string("name"), "alpha");
        assert_eq!(set.int("count"), 3);
        assert!(set.bool("verbose"));
    }

    #[test]
    fn bool_does_not_consume_next_token() {
        let mut set = flags();
        let parsed = parse(&mut set, &args(&["--verbose", "file.txt"])).unwrap();
        assert_eq!(positional(parsed), vec!["file.txt"]);
        assert!(set.bool("verbose"));
    }

    #[test]
    fn bool_with_explicit_value() {
        let mut set = flags();
        parse(&mut set, &args(&["--verbose=false"])).unwrap();
        assert!(!set.bool("verbose"));
        assert_eq!(set.value("verbose"), Some(&FlagValue::Bool(false)));
    }

    #[test]
    fn short_forms() {
        let mut set = flags();
        parse(&mut set, &args(&["-nbeta", "-c", "7", "-t=5s", "-v"])).unwrap();
        assert_eq!(set.string("name"), "beta");
        assert_eq!(set.int("count"), 7);
        assert_eq!(set.duration("timeout"), Duration::from_secs(5));
        assert!(set.bool("verbose"));
    }

    #[test]
    fn short_bool_cluster() {
        let mut set = flags();
        parse(&mut set, &args(&["-vf"])).unwrap();
        assert!(set.bool("verbose"));
        assert!(set.bool("force"));
    }

    #[test]
    fn short_cluster_ending_in_value_flag() {
        let mut set = flags();
        parse(&mut set, &args(&["-vn", "gamma"])).unwrap();
        assert!(set.bool("verbose"));
        assert_eq!(set.string("name"), "gamma");
    }

    #[test]
    fn interleaved_positionals() {
        let mut set = flags();
        let parsed = parse(&mut set, &args(&["a", "-v", "b", "--count=2", "c"])).unwrap();
        assert_eq!(positional(parsed), vec!["a", "b", "c"]);
    }

    #[test]
    fn double_dash_ends_flags() {
        let mut set = flags();
        let parsed = parse(&mut set, &args(&["--", "--verbose", "-x"])).unwrap();
        assert_eq!(positional(parsed), vec!["--verbose", "-x"]);
        assert!(!set.bool("verbose"));
    }

    #[test]
    fn single_dash_is_positional() {
        let mut set = flags();
        let parsed = parse(&mut set, &args(&["-"])).unwrap();
        assert_eq!(positional(parsed), vec!["-"]);
    }

    #[test]
    fn unknown_long_flag() {
        let mut set = flags();
        let err = parse(&mut set, &args(&["--nope"])).unwrap_err();
        assert_eq!(err.to_string(), "unknown flag: --nope");
    }

    #[test]
    fn unknown_short_flag() {
        let mut set = flags();
        let err = parse(&mut set, &args(&["-x"])).unwrap_err();
        assert_eq!(err.to_string(), "unknown flag: -x");
    }

    #[test]
    fn missing_value() {
        let mut set = flags();
        let err = parse(&mut set, &args(&["--name"])).unwrap_err();
        assert_eq!(err.to_string(), "flag needs an argument: --name");

        let err = parse(&mut set, &args(&["-c"])).unwrap_err();
        assert_eq!(err.to_string(), "flag needs an argument: --count");
    }

    #[test]
    fn malformed_typed_value() {
        let mut set = flags();
        let err = parse(&mut set, &args(&["--count", "many"])).unwrap_err();
        assert!(matches!(err, CliError::InvalidFlagValue { .. }));

        let err = parse(&mut set, &args(&["--timeout=later"])).unwrap_err();
        assert!(matches!(err, CliError::InvalidFlagValue { .. }));
    }

    #[test]
    fn help_requests() {
        let mut set = flags();
        assert_eq!(parse(&mut set, &args(&["--help"])).unwrap(), Parsed::Help);
        assert_eq!(parse(&mut set, &args(&["-h"])).unwrap(), Parsed::Help);
        assert_eq!(
            parse(&mut set, &args(&["pos", "-vh"])).unwrap(),
            Parsed::Help
        );
    }

    #[test]
    fn unknown_short_inside_cluster_names_the_letter() {
        let mut set = flags();
        let err = parse(&mut set, &args(&["-vx"])).unwrap_err();
        assert_eq!(err.to_string(), "unknown flag: -x");
    }

    #[test]
    fn value_flag_accepts_hyphenated_value() {
        let mut set = flags();
        parse(&mut set, &args(&["--count", "-3", "--name", "-"])).unwrap();
        assert_eq!(set.int("count"), -3);
        assert_eq!(set.string("name"), "-");
    }

    #[test]
    fn repeated_flag_keeps_last_value() {
        let mut set = flags();
        parse(&mut set, &args(&["-n", "one", "--name=two"])).unwrap();
        assert_eq!(set.string("name"), "two");
    }

    #[test]
    fn duplicate_names_bind_first_flag() {
        let mut set = FlagSet::new(vec![
            Flag::string("output", "").short('o'),
            Flag::string("output", "").short('o'),
        ]);
        parse(&mut set, &args(&["-o", "json"])).unwrap();
        assert_eq!(set.string("output"), "json");
        assert_eq!(set.iter().nth(1).and_then(Flag::value), None);
    }

    #[test]
    fn declared_h_shorthand_wins_over_help() {
        let mut set = FlagSet::new(vec![Flag::string("host", "").short('h')]);
        let parsed = parse(&mut set, &args(&["-h", "example.com"])).unwrap();
        assert_eq!(positional(parsed), Vec::<String>::new());
        assert_eq!(set.string("host"), "example.com");
    }
}
