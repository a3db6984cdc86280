//! TOML-based operator configuration.
//!
//! Stores where the status document lives and how to authenticate
//! against the store. Configuration lives at
//! `~/.config/statusgate/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;

/// Operator configuration.
///
/// Serialized to/from TOML at `~/.config/statusgate/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// URL of the published status document.
    #[serde(default)]
    pub document_url: String,
    /// Bearer token for stores that require authentication.
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document_url: String::new(),
            auth_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/statusgate"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load configuration, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load() -> Self {
        Self::path()
            .ok()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let body = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, body).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "document_url" => Some(self.document_url.clone()),
            "auth_token" => Some(self.auth_token.clone().unwrap_or_default()),
            "timeout_secs" => Some(self.timeout_secs.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "document_url" => self.document_url = value.to_string(),
            "auth_token" => {
                self.auth_token = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                }
            }
            "timeout_secs" => {
                self.timeout_secs = value.parse().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("'{value}' is not a number of seconds"),
                })?
            }
            _ => return Err(ConfigError::MissingKey(key.to_string())),
        }
        self.save()
    }
}
