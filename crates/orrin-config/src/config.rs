use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::paths::PathManager;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub lists: ListsConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct CatalogConfig {
    /// JSON array of media records; defaults to `<data dir>/catalog.json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct StoreConfig {
    /// Saved list state; defaults to `<data dir>/lists.json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ListsConfig {
    /// Reject custom lists whose name is already taken in the same category
    #[serde(default)]
    pub unique_names: bool,
    /// Prefix for generated list names ("Custom List 3")
    #[serde(default = "default_name_prefix")]
    pub default_name_prefix: String,
}

/// Optional json-server compatible backend the lists are mirrored to
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RemoteConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Write logs to a daily-rotated file instead of stderr
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

fn default_name_prefix() -> String {
    "Custom List".to_string()
}

fn default_base_url() -> String {
    "http://localhost:3001".to_string()  // json-server default port
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_user_id() -> String {
    "1".to_string()
}

impl Default for ListsConfig {
    fn default() -> Self {
        Self {
            unique_names: false,
            default_name_prefix: default_name_prefix(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            user_id: default_user_id(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.lists.default_name_prefix.trim().is_empty() {
            return Err(anyhow::anyhow!("lists.default_name_prefix cannot be empty"));
        }

        if self.remote.enabled {
            let url = self.remote.base_url.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow::anyhow!("remote.base_url must be an http(s) URL, got {:?}", url));
            }
            if self.remote.timeout_seconds == 0 {
                return Err(anyhow::anyhow!("remote.timeout_seconds must be greater than zero"));
            }
            if self.remote.user_id.trim().is_empty() {
                return Err(anyhow::anyhow!("remote.user_id is required when remote is enabled"));
            }
        }

        Ok(())
    }

    pub fn catalog_path(&self, paths: &PathManager) -> PathBuf {
        self.catalog.path.clone().unwrap_or_else(|| paths.catalog_file())
    }

    pub fn snapshot_path(&self, paths: &PathManager) -> PathBuf {
        self.store.snapshot_path.clone().unwrap_or_else(|| paths.snapshot_file())
    }
}
