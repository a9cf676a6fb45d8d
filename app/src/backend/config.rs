//! # Application Configuration
//!
//! Optional `config.yaml` in the data directory, with environment overrides.
//!
//! ```yaml
//! bind_address: "127.0.0.1:3000"
//! gemini_api_key: "..."
//! gemini_model: "gemini-1.5-flash"
//! export_directory: "/Users/me/Desktop"
//! ```
//!
//! Environment: `DAIGOU_DATA_DIR` picks the data directory, `GEMINI_API_KEY`
//! and `DAIGOU_BIND_ADDRESS` override the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::backend::storage::FileConnection;

pub const CONFIG_FILE_NAME: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bind_address: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub export_directory: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            gemini_api_key: None,
            gemini_model: "gemini-1.5-flash".to_string(),
            export_directory: None,
        }
    }
}

impl AppConfig {
    /// Read `config.yaml` from the data directory, defaults when it is absent
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        let config_path = data_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            debug!("No config file at {:?}, using defaults", config_path);
            return Ok(Self::default());
        }

        let yaml_content = fs::read_to_string(&config_path)
            .with_context(|| format!("reading {}", config_path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("parsing {}", config_path.display()))?;
        info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    /// Apply environment overrides through `lookup`
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.gemini_api_key = Some(key);
        }
        if let Some(addr) = lookup("DAIGOU_BIND_ADDRESS").filter(|a| !a.trim().is_empty()) {
            self.bind_address = addr;
        }
        self
    }

    /// Load the config for `data_dir` with process environment overrides
    pub fn load(data_dir: &Path) -> Result<Self> {
        Ok(Self::load_from_dir(data_dir)?.with_overrides(|name| std::env::var(name).ok()))
    }
}

/// `DAIGOU_DATA_DIR` when set, otherwise ~/Documents/Daigou Ledger
pub fn resolve_data_directory() -> Result<PathBuf> {
    match std::env::var("DAIGOU_DATA_DIR") {
        Ok(dir) if !dir.trim().is_empty() => Ok(PathBuf::from(dir.trim())),
        _ => FileConnection::default_data_directory(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig::load_from_dir(temp_dir.path()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "gemini_api_key: \"abc\"\nexport_directory: /tmp/out\n",
        )
        .unwrap();

        let config = AppConfig::load_from_dir(temp_dir.path()).unwrap();
        assert_eq!(config.gemini_api_key.as_deref(), Some("abc"));
        assert_eq!(config.export_directory, Some(PathBuf::from("/tmp/out")));
        assert_eq!(config.bind_address, "127.0.0.1:3000");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "bind_address: [oops").unwrap();
        assert!(AppConfig::load_from_dir(temp_dir.path()).is_err());
    }

    #[test]
    fn test_environment_overrides() {
        let config = AppConfig::default().with_overrides(|name| match name {
            "GEMINI_API_KEY" => Some("from-env".to_string()),
            "DAIGOU_BIND_ADDRESS" => Some("127.0.0.1:8088".to_string()),
            _ => None,
        });
        assert_eq!(config.gemini_api_key.as_deref(), Some("from-env"));
        assert_eq!(config.bind_address, "127.0.0.1:8088");

        let untouched = AppConfig::default().with_overrides(|_| Some(" ".to_string()));
        assert_eq!(untouched, AppConfig::default());
    }
}
