//! The effective flag set of one invocation.

use std::time::Duration;

use super::flag::{Flag, FlagKind, FlagValue};

/// Ordered flags for one invocation: engine-wide flags first, then the
/// command's own. Lookups by name return the first match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet {
    flags: Vec<Flag>,
}

impl FlagSet {
    pub fn new(flags: Vec<Flag>) -> Self {
        Self { flags }
    }

    /// Concatenate global and command flags, global first.
    pub fn effective(global: &[Flag], command: &[Flag]) -> Self {
        Self {
            flags: global.iter().chain(command).cloned().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Flag> {
        self.flags.iter()
    }

    /// Look up a flag by long name.
    pub fn get(&self, name: &str) -> Option<&Flag> {
        self.flags.iter().find(|f| f.name() == name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Flag> {
        self.flags.iter_mut().find(|f| f.name() == name)
    }

    fn typed(&self, name: &str, kind: FlagKind) -> Option<&FlagValue> {
        self.flags
            .iter()
            .find(|f| f.name() == name && f.kind() == kind)
            .and_then(Flag::effective)
    }

    /// Parsed value, else the default, else `false`.
    pub fn bool(&self, name: &str) -> bool {
        match self.typed(name, FlagKind::Bool) {
            Some(FlagValue::Bool(v)) => *v,
            _ => false,
        }
    }

    /// Parsed value, else the default, else `0`.
    pub fn int(&self, name: &str) -> i64 {
        match self.typed(name, FlagKind::Int) {
            Some(FlagValue::Int(v)) => *v,
            _ => 0,
        }
    }

    /// Parsed value, else the default, else the empty string.
    pub fn string(&self, name: &str) -> String {
        match self.typed(name, FlagKind::String) {
            Some(FlagValue::String(v)) => v.clone(),
            _ => String::new(),
        }
    }

    /// Parsed value, else the default, else zero.
    pub fn duration(&self, name: &str) -> Duration {
        match self.typed(name, FlagKind::Duration) {
            Some(FlagValue::Duration(v)) => *v,
            _ => Duration::ZERO,
        }
    }

    /// The raw parsed value, ignoring defaults.
    pub fn value(&self, name: &str) -> Option<&FlagValue> {
        self.get(name).and_then(Flag::value)
    }
}

impl<'a> IntoIterator for &'a FlagSet {
    type Item = &'a Flag;
    type IntoIter = std::slice::Iter<'a, Flag>;

    fn into_iter(self) -> Self::IntoIter {
        self.flags.iter()
    }
}
