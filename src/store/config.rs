//! Store root resolution

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Environment variable overriding the local store root.
pub const STORE_DIR_ENV: &str = "SCOUR_STORE_DIR";

/// Configuration for the on-disk store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base directory for artifact storage (default: ~/.scour)
    pub root: PathBuf,
}

impl StoreConfig {
    /// Create config from the environment: `SCOUR_STORE_DIR` when set,
    /// otherwise `~/.scour`.
    pub fn from_env() -> Result<Self> {
        if let Ok(dir) = std::env::var(STORE_DIR_ENV) {
            return Ok(Self {
                root: PathBuf::from(dir),
            });
        }
        let home = dirs::home_dir().ok_or_else(|| {
            Error::Io(std::io::Error::other("could not determine home directory"))
        })?;
        Ok(Self {
            root: home.join(".scour"),
        })
    }

    /// Create config with an explicit root directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_root() {
        let config = StoreConfig::with_root("/tmp/store");
        assert_eq!(config.root, PathBuf::from("/tmp/store"));
    }
}
