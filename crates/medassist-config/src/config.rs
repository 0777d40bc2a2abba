//! Configuration management for the client.

use crate::{CoreError, CoreResult, Paths};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Default API base URL (can be overridden at compile time via MEDASSIST_API_URL env var).
pub const DEFAULT_API_BASE_URL: &str = match option_env!("MEDASSIST_API_URL") {
    Some(url) => url,
    None => "http://localhost:5000",
};

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Default number of records requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Main client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Base URL of the Med Assist API; request paths are resolved against it.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Per-request timeout applied by the HTTP transport. 0 disables it.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Records requested per page when listing.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            page_size: default_page_size(),
        }
    }
}

impl Config {
    /// Load configuration from the config file, falling back to defaults,
    /// then apply environment overrides.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.load_from_env();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.config_file(), content)?;
        Ok(())
    }

    fn load_from_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply `MEDASSIST_*` overrides from `lookup`. Empty and unparseable
    /// values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(level) = lookup("MEDASSIST_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(url) = lookup("MEDASSIST_API_URL") {
            self.api_base_url = url;
        }
        if let Some(secs) = lookup("MEDASSIST_REQUEST_TIMEOUT_SECS").and_then(|v| v.parse().ok())
        {
            self.request_timeout_secs = secs;
        }
    }

    /// Check values that would otherwise only fail at first use.
    pub fn validate(&self) -> CoreResult<()> {
        self.api_base_url()?;
        if self.page_size == 0 {
            return Err(CoreError::Config("page_size must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Get the API base URL as a parsed URL.
    pub fn api_base_url(&self) -> CoreResult<Url> {
        Url::parse(&self.api_base_url).map_err(CoreError::from)
    }

    /// Request timeout, or `None` when disabled.
    pub fn request_timeout(&self) -> Option<std::time::Duration> {
        (self.request_timeout_secs > 0)
            .then(|| std::time::Duration::from_secs(self.request_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_config_load_from_file_fills_missing_fields() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");

        std::fs::write(&config_path, r#"{ "log_level": "debug" }"#).unwrap();

        let config = Config::load_from_file(&config_path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_config_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        let config = Config {
            api_base_url: "https://api.medassist.test".to_string(),
            page_size: 50,
            ..Config::default()
        };
        config.save(&paths).unwrap();

        let loaded = Config::load_from_file(&paths.config_file()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_load_nonexistent_uses_defaults() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        let config = Config::load(&paths).unwrap();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_apply_overrides() {
        let env: HashMap<&str, &str> = [
            ("MEDASSIST_LOG_LEVEL", "trace"),
            ("MEDASSIST_API_URL", "https://staging.medassist.test"),
            ("MEDASSIST_REQUEST_TIMEOUT_SECS", "5"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.log_level, "trace");
        assert_eq!(config.api_base_url, "https://staging.medassist.test");
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn test_apply_overrides_ignores_blank_and_invalid() {
        let mut config = Config::default();
        config.apply_overrides(|name| match name {
            "MEDASSIST_API_URL" => Some("   ".to_string()),
            "MEDASSIST_REQUEST_TIMEOUT_SECS" => Some("soon".to_string()),
            _ => None,
        });

        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_api_base_url_parse() {
        let config = Config::default();
        let url = config.api_base_url().unwrap();
        assert!(url.scheme().starts_with("http"));
    }

    #[test]
    fn test_config_invalid_url() {
        let config = Config {
            api_base_url: "not a valid url".to_string(),
            ..Config::default()
        };

        assert!(config.api_base_url().is_err());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let config = Config {
            page_size: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn test_request_timeout_disabled_at_zero() {
        let config = Config {
            request_timeout_secs: 0,
            ..Config::default()
        };
        assert!(config.request_timeout().is_none());
        assert_eq!(
            Config::default().request_timeout(),
            Some(std::time::Duration::from_secs(30))
        );
    }
}
