//! Configuration for elohim-shares

use crate::error::{Result, StorageError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Ceiling advertised for mutable shares (1 TiB)
pub const DEFAULT_MAXIMUM_MUTABLE_SHARE_SIZE: u64 = 1 << 40;

/// Default storage directory
pub fn default_storage_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("elohim-shares")
}

fn default_application_version() -> String {
    format!("elohim-shares/{}", env!("CARGO_PKG_VERSION"))
}

fn default_maximum_mutable_share_size() -> u64 {
    DEFAULT_MAXIMUM_MUTABLE_SHARE_SIZE
}

/// Constants a backend reports, supplied at construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Reported as `application-version`
    #[serde(default = "default_application_version")]
    pub application_version: String,

    /// Reported as `maximum-mutable-share-size`
    #[serde(default = "default_maximum_mutable_share_size")]
    pub maximum_mutable_share_size: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            application_version: default_application_version(),
            maximum_mutable_share_size: DEFAULT_MAXIMUM_MUTABLE_SHARE_SIZE,
        }
    }
}

/// Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Storage root; shares live under `<storage_dir>/shares`
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,

    #[serde(flatten)]
    pub backend: BackendConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            backend: BackendConfig::default(),
        }
    }
}

impl Config {
    /// Load config from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| StorageError::Config(e.to_string()))
    }

    /// Save config to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| StorageError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get config file path
    pub fn config_path(&self) -> PathBuf {
        self.storage_dir.join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = BackendConfig::default();
        assert!(config.application_version.starts_with("elohim-shares/"));
        assert_eq!(config.maximum_mutable_share_size, 1_099_511_627_776);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(r#"storage_dir = "/var/lib/elohim-shares""#).unwrap();
        assert_eq!(config.storage_dir, PathBuf::from("/var/lib/elohim-shares"));
        assert_eq!(config.backend, BackendConfig::default());
    }

    #[test]
    fn test_flattened_backend_fields() {
        let toml_str = r#"
storage_dir = "/data"
application_version = "custom/1.2"
maximum_mutable_share_size = 4096
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend.application_version, "custom/1.2");
        assert_eq!(config.backend.maximum_mutable_share_size, 4096);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            storage_dir: temp_dir.path().to_path_buf(),
            backend: BackendConfig {
                application_version: "node/7".to_string(),
                maximum_mutable_share_size: 99,
            },
        };

        config.save(config.config_path()).unwrap();
        let loaded = Config::load(config.config_path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "maximum_mutable_share_size = \"lots\"").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, StorageError::Config(_)));
    }
}
