//! Configuration loading for Venosim.
//!
//! ```toml
//! # ~/.venosim/config.toml
//! api_key = "AIza..."
//! model = "gemini-3-flash-preview"
//! high_contrast = false
//! ```
//!
//! The `GEMINI_API_KEY` environment variable overrides the file. A missing
//! credential is expected, not an error: the app runs in offline mode.

use std::{
    env,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use venosim_providers::ExplanationClient;
use venosim_types::ApiKey;

/// Environment variable consulted before the config file.
pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";

#[derive(Default, Deserialize)]
pub struct VenosimConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    /// Override the API base URL. Used to point the client at a local mock
    /// server or a proxy.
    pub api_base_url: Option<String>,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
}

// Manual Debug impl to prevent leaking the API key in logs.
impl std::fmt::Debug for VenosimConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VenosimConfig")
            .field(
                "api_key",
                &if self.api_key.is_some() {
                    "[REDACTED]"
                } else {
                    "None"
                },
            )
            .field("model", &self.model)
            .field("api_base_url", &self.api_base_url)
            .field("high_contrast", &self.high_contrast)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl VenosimConfig {
    /// Load `~/.venosim/config.toml`. Missing file or unknown home directory
    /// yield `Ok(None)`.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let path = match Self::path() {
            Some(path) => path,
            None => return Ok(None),
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            tracing::warn!("Failed to read config at {:?}: {}", path, source);
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;
        toml::from_str(&content).map_err(|source| {
            tracing::warn!("Failed to parse config at {:?}: {}", path, source);
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".venosim").join("config.toml"))
    }

    /// Resolve the credential: environment first, then the config file.
    #[must_use]
    pub fn resolve_api_key(&self) -> Option<ApiKey> {
        if let Ok(key) = env::var(API_KEY_ENV_VAR)
            && !key.trim().is_empty()
        {
            return Some(ApiKey::new(key));
        }
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .map(ApiKey::new)
    }

    /// Build the explanation client described by this config.
    #[must_use]
    pub fn explanation_client(&self) -> ExplanationClient {
        let mut client = ExplanationClient::new(self.resolve_api_key());
        if let Some(model) = self.model.as_deref().filter(|m| !m.trim().is_empty()) {
            client = client.with_model(model);
        }
        if let Some(base) = self.api_base_url.as_deref().filter(|b| !b.trim().is_empty()) {
            client = client.with_base_url(base);
        }
        client
    }
}
