//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the backend address, where the session token is kept,
//! the landing route, and the last used username.
//!
//! Configuration is stored at `~/.config/catalog-admin/config.json`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::client::DEFAULT_BASE_URL;
use crate::routes::{Destinations, Route};
use crate::storage::{FileStorage, KeyringStorage, TokenStorage};

/// Application name used for config/data directory paths
const APP_NAME: &str = "catalog-admin";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the backend address
pub const ENV_API_URL: &str = "CATALOG_API_URL";

/// Environment variable pre-filling the sign-in username
pub const ENV_USERNAME: &str = "CATALOG_USERNAME";

/// Where the persisted token record lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenBackend {
    #[default]
    File,
    Keyring,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub token_backend: TokenBackend,
    pub landing_route: Route,
    pub last_username: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            token_backend: TokenBackend::default(),
            landing_route: Route::Home,
            last_username: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Load the config, falling back to defaults on any error.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply environment overrides on top of the file settings.
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(ENV_API_URL).ok(),
            std::env::var(ENV_USERNAME).ok(),
        );
    }

    fn apply_overrides(&mut self, api_url: Option<String>, username: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(user) = username.filter(|u| !u.trim().is_empty()) {
            self.last_username = Some(user);
        }
    }

    /// Sign-in and landing destinations. A public landing route is rejected.
    pub fn destinations(&self) -> Destinations {
        let landing = if self.landing_route.is_public() {
            warn!(route = ?self.landing_route, "Landing route must be private, using Home");
            Route::Home
        } else {
            self.landing_route
        };
        Destinations::new(Route::SignIn, landing)
    }

    /// Build the storage backend for the persisted token record.
    pub fn token_storage(&self) -> Result<Box<dyn TokenStorage + Send>> {
        Ok(match self.token_backend {
            TokenBackend::File => Box::new(FileStorage::in_dir(&Self::data_dir()?)),
            TokenBackend::Keyring => Box::new(KeyringStorage::new()),
        })
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for the token file and logs.
    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    pub fn log_dir() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:5174");
        assert_eq!(config.token_backend, TokenBackend::File);
        assert_eq!(config.destinations(), Destinations::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"token_backend": "keyring"}"#).unwrap();
        assert_eq!(config.token_backend, TokenBackend::Keyring);
        assert_eq!(config.api_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.landing_route, Route::Home);
    }

    #[test]
    fn test_public_landing_route_rejected() {
        let config = Config {
            landing_route: Route::SignUp,
            ..Config::default()
        };
        assert_eq!(config.destinations().landing, Route::Home);

        let config = Config {
            landing_route: Route::Articles,
            ..Config::default()
        };
        assert_eq!(config.destinations().landing, Route::Articles);
    }

    #[test]
    fn test_overrides_ignore_blank_values() {
        let mut config = Config::default();
        config.apply_overrides(Some("  ".to_string()), None);
        assert_eq!(config.api_base_url, DEFAULT_BASE_URL);

        config.apply_overrides(Some("https://catalog.example.org".to_string()), Some("ada".to_string()));
        assert_eq!(config.api_base_url, "https://catalog.example.org");
        assert_eq!(config.last_username.as_deref(), Some("ada"));
    }
}
