use std::fmt;
use std::str::FromStr;

use crate::flags::FlagSet;

/// How tables and info blocks are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    /// Read the `output` flag. Only `json` selects JSON.
    pub fn from_flags(flags: &FlagSet) -> Self {
        flags.string("output").parse().unwrap_or_default()
    }
}

impl FromStr for OutputFormat {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        })
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::Flag;

    #[test]
    fn only_json_selects_json() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
    }

    #[test]
    fn from_flags_reads_output() {
        let mut flags = FlagSet::new(vec![Flag::string("output", "output format")]);
        assert_eq!(OutputFormat::from_flags(&flags), OutputFormat::Text);

        flags.get_mut("output").unwrap().set("json").unwrap();
        assert_eq!(OutputFormat::from_flags(&flags), OutputFormat::Json);
    }

    #[test]
    fn missing_flag_is_text() {
        let flags = FlagSet::default();
        assert_eq!(OutputFormat::from_flags(&flags), OutputFormat::Text);
    }
}
