//! Application configuration loaded from TOML.

use crate::types::DEFAULT_FX_RATE;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Runtime configuration.
///
/// Read from `$TRADEBOOK_CONFIG` or `<config_dir>/tradebook/config.toml`.
/// Every field is optional in the file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Store file location. `TRADEBOOK_STORE_FILE` takes precedence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
    /// USD rate used until the first sample is recorded
    pub default_fx_rate: f64,
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: None,
            default_fx_rate: DEFAULT_FX_RATE,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Default config file path.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var("TRADEBOOK_CONFIG") {
            return PathBuf::from(path);
        }

        directories::ProjectDirs::from("", "", "tradebook")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("tradebook.toml"))
    }

    /// Load from the default path, falling back to defaults on any error.
    pub fn load() -> Self {
        let path = Self::default_path();
        match Self::load_from_path(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load from a specific path. A missing file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config.sanitized())
    }

    /// Resolve the store file: env override, then config, then the data directory.
    pub fn store_path(&self) -> PathBuf {
        if let Ok(path) = env::var("TRADEBOOK_STORE_FILE") {
            return PathBuf::from(path);
        }
        if let Some(path) = &self.store_path {
            return path.clone();
        }

        directories::ProjectDirs::from("", "", "tradebook")
            .map(|dirs| dirs.data_dir().join("store.json"))
            .unwrap_or_else(|| PathBuf::from("tradebook.json"))
    }

    fn sanitized(mut self) -> Self {
        if !(self.default_fx_rate.is_finite() && self.default_fx_rate > 0.0) {
            tracing::warn!(
                "default_fx_rate {} is not a positive rate, using {}",
                self.default_fx_rate,
                DEFAULT_FX_RATE
            );
            self.default_fx_rate = DEFAULT_FX_RATE;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from_path(&dir.path().join("none.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.default_fx_rate, 1000.0);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_fx_rate = 1250.5\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.default_fx_rate, 1250.5);
        assert_eq!(config.log_filter, "info");
        assert!(config.store_path.is_none());
    }

    #[test]
    fn test_store_path_from_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "store_path = \"/tmp/book.json\"\nlog_filter = \"debug\"\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.store_path, Some(PathBuf::from("/tmp/book.json")));
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_invalid_rate_replaced() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_fx_rate = -3.0\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.default_fx_rate, DEFAULT_FX_RATE);
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_fx_rate = \"lots\"").unwrap();

        assert!(matches!(Config::load_from_path(&path), Err(Error::Config(_))));
    }
}
