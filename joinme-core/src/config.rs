//! JoinMe configuration.
//!
//! Read from `~/.config/joinme/config.toml`, then overridden by `JOINME__*`
//! environment variables (e.g. `JOINME__STORE__ENDPOINT`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::deep_link::DEFAULT_SCHEME;
use crate::error::{JoinMeError, JoinMeResult};
use crate::notify::DEFAULT_LEAD_MINUTES;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JoinMeConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub notifications: NotificationConfig,

    #[serde(default)]
    pub deep_links: DeepLinkConfig,

    /// Where offline snapshots are written; defaults to the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Remote document store endpoint. Without one, only offline snapshots are usable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_lead_minutes")]
    pub lead_minutes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepLinkConfig {
    #[serde(default = "default_scheme")]
    pub scheme: String,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_lead_minutes() -> u32 {
    DEFAULT_LEAD_MINUTES
}

fn default_scheme() -> String {
    DEFAULT_SCHEME.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            endpoint: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        NotificationConfig {
            lead_minutes: DEFAULT_LEAD_MINUTES,
        }
    }
}

impl Default for DeepLinkConfig {
    fn default() -> Self {
        DeepLinkConfig {
            scheme: default_scheme(),
        }
    }
}

impl StoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl JoinMeConfig {
    pub fn config_path() -> JoinMeResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| JoinMeError::Config("Could not determine config directory".into()))?
            .join("joinme");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the user's config, creating a commented default file on first run.
    pub fn load() -> JoinMeResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from `path` (optional) layered under the environment.
    pub fn load_from(path: &Path) -> JoinMeResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("JOINME")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .map_err(|e| JoinMeError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| JoinMeError::Config(e.to_string()))
    }

    pub fn cache_dir(&self) -> JoinMeResult<PathBuf> {
        if let Some(dir) = &self.cache_dir {
            return Ok(dir.clone());
        }

        dirs::data_dir()
            .map(|d| d.join("joinme"))
            .ok_or_else(|| JoinMeError::Config("Could not determine data directory".into()))
    }

    /// Save the current config to `path`.
    pub fn save(&self, path: &Path) -> JoinMeResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| JoinMeError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| JoinMeError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> JoinMeResult<()> {
        let contents = format!(
            "\
# JoinMe configuration

[store]
# Remote document store endpoint:
# endpoint = \"https://store.example.com/v1\"
# timeout_secs = {DEFAULT_TIMEOUT_SECS}

[notifications]
# Minutes before an event starts to remind you:
# lead_minutes = {DEFAULT_LEAD_MINUTES}

[deep_links]
# scheme = \"{DEFAULT_SCHEME}\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                JoinMeError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| JoinMeError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
