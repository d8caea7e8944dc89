//! Persisted per-user settings.
//!
//! A [`Settings`] store keeps small named string values, such as a selected
//! account or a default region, between runs of a program.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{CliError, Result};

/// Capability to read, write and delete named values.
pub trait Settings: Send + Sync {
    /// The stored value, or `None` if it was never written.
    fn read(&self, name: &str) -> Result<Option<String>>;

    fn write(&self, name: &str, value: &str) -> Result<()>;

    /// Remove a value. Removing a missing value succeeds.
    fn delete(&self, name: &str) -> Result<()>;
}

/// Stores each value in its own file under a directory.
///
/// The directory is created on first write. Values are trimmed of
/// surrounding whitespace when read, so hand-edited files with a trailing
/// newline read back cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSettings {
    dir: PathBuf,
}

impl FileSettings {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file(&self, name: &str) -> Result<PathBuf> {
        let valid = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\']);
        if !valid {
            return Err(CliError::Other(anyhow::anyhow!(
                "invalid setting name: {:?}",
                name
            )));
        }
        Ok(self.dir.join(name))
    }
}

impl Settings for FileSettings {
    fn read(&self, name: &str) -> Result<Option<String>> {
        let file = self.file(name)?;
        match fs::read_to_string(&file) {
            Ok(data) => Ok(Some(data.trim().to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, name: &str, value: &str) -> Result<()> {
        let file = self.file(name)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&file, value)?;
        tracing::debug!("wrote setting {} to {}", name, file.display());
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<()> {
        let file = self.file(name)?;
        match fs::remove_file(&file) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
