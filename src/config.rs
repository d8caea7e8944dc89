//! Engine configuration.
//!
//! An [`EngineConfig`] is built once at program start and handed to
//! [`Engine::new`](crate::cli::Engine::new). Nothing in the crate reads
//! process-wide state after that.

use std::path::PathBuf;

/// Program identity and output settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Program name, used in help output and for the settings directory.
    pub name: String,

    /// Version string printed by `-v`/`--version`.
    pub version: String,

    /// Emit ANSI colors.
    pub color: bool,

    /// Print error source chains under error messages.
    pub debug: bool,

    /// Directory for persisted settings, if any.
    pub settings_dir: Option<PathBuf>,
}

impl EngineConfig {
    /// A config with color and debug off and no settings directory.
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            color: false,
            debug: false,
            settings_dir: None,
        }
    }

    /// Derive output settings from the environment.
    ///
    /// - color: stdout is a terminal and `NO_COLOR` is unset
    /// - debug: `DEBUG=true`
    /// - settings: `<config dir>/<name>`
    pub fn from_env(name: &str, version: &str) -> Self {
        Self {
            color: should_use_colors(),
            debug: debug_enabled(),
            settings_dir: dirs::config_dir().map(|dir| dir.join(name)),
            ..Self::new(name, version)
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_settings_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.settings_dir = Some(dir.into());
        self
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    console::Term::stdout().is_term()
}

/// Check the `DEBUG` environment variable.
pub fn debug_enabled() -> bool {
    std::env::var("DEBUG").is_ok_and(|v| v == "true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_has_quiet_defaults() {
        let config = EngineConfig::new("app", "1.0.0");
        assert_eq!(config.name, "app");
        assert_eq!(config.version, "1.0.0");
        assert!(!config.color);
        assert!(!config.debug);
        assert_eq!(config.settings_dir, None);
    }

    #[test]
    fn builders_override_fields() {
        let config = EngineConfig::new("app", "1.0.0")
            .with_color(true)
            .with_debug(true)
            .with_settings_dir("/tmp/app");
        assert!(config.color);
        assert!(config.debug);
        assert_eq!(config.settings_dir, Some(PathBuf::from("/tmp/app")));
    }

    #[test]
    fn from_env_keeps_identity() {
        let config = EngineConfig::from_env("app", "2.0.0");
        assert_eq!(config.name, "app");
        assert_eq!(config.version, "2.0.0");
        if let Some(dir) = config.settings_dir {
            assert!(dir.ends_with("app"));
        }
    }
}
