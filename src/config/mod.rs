//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::models::ClanIdentity;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Remote war-data API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the API, e.g. `https://api.clashofclans.com/v1`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token sent with every request
    #[serde(default)]
    pub token: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// How many war records are fetched at once during a refresh
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,
}

fn default_base_url() -> String {
    "https://api.clashofclans.com/v1".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_concurrent_fetches() -> usize {
    4
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_seconds: default_timeout(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
        }
    }
}

/// The clan whose members are ranked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClanConfig {
    #[serde(default = "default_clan_tag")]
    pub tag: String,

    /// Display name, used only for war records that omit the clan tag
    #[serde(default = "default_clan_name")]
    pub name: Option<String>,
}

fn default_clan_tag() -> String {
    "#2LPOGLU2U".to_string()
}

fn default_clan_name() -> Option<String> {
    Some("Tranquility".to_string())
}

impl Default for ClanConfig {
    fn default() -> Self {
        Self {
            tag: default_clan_tag(),
            name: default_clan_name(),
        }
    }
}

impl ClanConfig {
    pub fn identity(&self) -> ClanIdentity {
        ClanIdentity::new(self.tag.as_str(), self.name.clone())
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub clan: ClanConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            api: ApiConfig::default(),
            clan: ClanConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load the file if present (defaults otherwise), then apply environment
    /// overrides and validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Overlay `API_KEY`, `BASE_URL` and `CLAN_TAG` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Overlay values from an environment-like lookup. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = get("API_KEY") {
            self.api.token = Some(token);
        }
        if let Some(base_url) = get("BASE_URL") {
            self.api.base_url = base_url;
        }
        if let Some(tag) = get("CLAN_TAG") {
            self.clan.tag = tag;
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "API timeout must be greater than 0".to_string(),
            ));
        }

        if self.api.max_concurrent_fetches == 0 {
            return Err(ConfigError::ValidationError(
                "max_concurrent_fetches must be greater than 0".to_string(),
            ));
        }

        if self.clan.identity().tag.is_empty() {
            return Err(ConfigError::ValidationError(
                "Clan tag must not be empty".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tag;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, "info");
        assert_eq!(config.api.base_url, "https://api.clashofclans.com/v1");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.clan.tag, "#2LPOGLU2U");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_clan_identity() {
        let identity = ClanConfig::default().identity();
        assert_eq!(identity.tag, Tag::from("#2LPOGLU2U"));
        assert_eq!(identity.name.as_deref(), Some("Tranquility"));
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_timeout() {
        let mut config = AppConfig::default();
        config.api.timeout_seconds = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_concurrency() {
        let mut config = AppConfig::default();
        config.api.max_concurrent_fetches = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_empty_clan_tag() {
        let mut config = AppConfig::default();
        config.clan.tag = "#".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_token_is_not_a_validation_error() {
        let config = AppConfig::default();
        assert!(config.api.token.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("API_KEY", "secret-token"),
            ("BASE_URL", "http://localhost:9000/v1"),
            ("CLAN_TAG", ""),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.token.as_deref(), Some("secret-token"));
        assert_eq!(config.api.base_url, "http://localhost:9000/v1");
        // Empty values leave the configured tag alone
        assert_eq!(config.clan.tag, "#2LPOGLU2U");
    }

    #[test]
    fn test_from_file_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r##"
log_level = "debug"

[clan]
tag = "#ABC123"

[server]
port = 9090
"##,
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.clan.tag, "#ABC123");
        assert_eq!(config.clan.name.as_deref(), Some("Tranquility"));
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.api.max_concurrent_fetches, 4);
    }

    #[test]
    fn test_from_file_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();

        assert!(matches!(
            AppConfig::from_file(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        // Should be parseable
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.clan.tag, parsed.clan.tag);
        assert_eq!(config.api.base_url, parsed.api.base_url);
    }
}
