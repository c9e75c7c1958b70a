use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ServiceError;

/// Portal configuration.
///
/// Read from `~/.campus/config.toml` by the CLI; every field has a default so
/// a missing or partial file is fine. Command-line flags override it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Directory holding the portal database.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Path to the redb database file.
    /// Defaults to `{data_dir}/portal.redb` if not specified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,

    /// Simulated network latency applied before each submit completes.
    pub latency_ms: u64,

    /// Client identifier recorded in every security log entry.
    pub user_agent: String,

    /// Whether the dashboard exposes manual approve/reject controls.
    pub dev_mode: bool,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            db_path: None,
            latency_ms: 1500,
            user_agent: format!("campus-portal/{}", env!("CARGO_PKG_VERSION")),
            dev_mode: false,
        }
    }
}

impl PortalConfig {
    /// Default config file path: ~/.campus/config.toml.
    pub fn default_path() -> PathBuf {
        home_dir().join(".campus").join("config.toml")
    }

    /// Load config from disk, or return defaults if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ServiceError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| ServiceError::Storage(format!("read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| ServiceError::Validation(format!("parse {}: {e}", path.display())))
    }

    /// Save config to disk, creating the parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<(), ServiceError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ServiceError::Storage(e.to_string()))?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ServiceError::Internal(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ServiceError::Storage(e.to_string()))
    }

    /// Resolve the data directory, falling back to `~/.campus`.
    pub fn resolve_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| home_dir().join(".campus"))
    }

    /// Resolve the redb database path, falling back to `{data_dir}/portal.redb`.
    pub fn resolve_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| self.resolve_data_dir().join("portal.redb"))
    }
}

fn home_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
}
