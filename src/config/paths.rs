//! Path resolution for flowclock configuration and data files.
//!
//! All flowclock data is stored in `~/.flowclock/` unless overridden with
//! `--home` or `FLOWCLOCK_HOME`:
//! - `config.yaml` - Main configuration file
//! - `flowclock.db` - `SQLite` session log

use std::path::PathBuf;

use crate::error::FlowError;

/// Paths to flowclock configuration and data files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.flowclock/`
    pub root: PathBuf,
    /// Config file: `~/.flowclock/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.flowclock/flowclock.db`
    pub database: PathBuf,
}

impl Paths {
    /// Create paths based on the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, FlowError> {
        let home = std::env::var("HOME")
            .map_err(|_| FlowError::Config("Could not determine home directory".to_string()))?;

        Ok(Self::with_root(PathBuf::from(home).join(".flowclock")))
    }

    /// Use `root` if given, otherwise the default under `$HOME`.
    ///
    /// # Errors
    ///
    /// Returns an error if no root is given and the home directory cannot be
    /// determined.
    pub fn resolve(root: Option<PathBuf>) -> Result<Self, FlowError> {
        root.map_or_else(Self::new, |root| Ok(Self::with_root(root)))
    }

    /// Create paths with a custom root directory.
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("flowclock.db"),
            root,
        }
    }

    /// Ensure the root directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), FlowError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                FlowError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_with_root() {
        let root = PathBuf::from("/tmp/test-flowclock");
        let paths = Paths::with_root(root.clone());

        assert_eq!(paths.root, root);
        assert_eq!(paths.config_file, root.join("config.yaml"));
        assert_eq!(paths.database, root.join("flowclock.db"));
    }

    #[test]
    fn test_resolve_prefers_explicit_root() {
        let paths = Paths::resolve(Some(PathBuf::from("/srv/focus"))).unwrap();
        assert_eq!(paths.root, PathBuf::from("/srv/focus"));
    }

    #[test]
    fn test_ensure_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().join("a").join("b"));

        paths.ensure_dirs().unwrap();
        assert!(paths.root.is_dir());
    }
}
