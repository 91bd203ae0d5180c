//! Configuration types for scrap core
//!
//! Core only accepts fully resolved, validated configuration.
//! All discovery, loading, and merging happens in CLI layer.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default service endpoint
pub const DEFAULT_BASE_URL: &str = "https://scrapbox.io";

/// Default quiet period before a query goes to the remote service
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// A fully resolved project configuration ready for use by core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name, the first path segment of every page URL
    pub project: String,
    /// Session token sent as the `connect.sid` cookie
    pub token: String,
    /// Base URL of the service
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Debounce interval in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Directory holding the page cache (platform cache dir when unset)
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl ProjectConfig {
    /// Create a new project config with default endpoint and timing
    pub fn new(project: String, token: String) -> Self {
        Self {
            project,
            token,
            base_url: default_base_url(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            cache_dir: None,
        }
    }

    /// Set the service base URL
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Set the debounce interval
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// Set the cache directory
    pub fn with_cache_dir(mut self, cache_dir: PathBuf) -> Self {
        self.cache_dir = Some(cache_dir);
        self
    }

    /// Debounce interval as a duration
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.project.trim().is_empty() {
            return Err("Project name cannot be empty".to_string());
        }

        if self.project.contains('/') {
            return Err("Project name cannot contain '/'".to_string());
        }

        if self.token.is_empty() {
            return Err("Session token cannot be empty".to_string());
        }

        // Validate URL format
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("Base URL must start with http:// or https://".to_string());
        }

        if self.debounce_ms > 10_000 {
            return Err("Debounce interval must be at most 10000 ms".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_json() {
        let config: ProjectConfig =
            serde_json::from_str(r#"{"project": "demo", "token": "s%3Aabc"}"#).unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.debounce(), Duration::from_millis(100));
        assert!(config.cache_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let ok = ProjectConfig::new("demo".to_string(), "tok".to_string());
        assert!(ok.validate().is_ok());

        let no_project = ProjectConfig::new(" ".to_string(), "tok".to_string());
        assert!(no_project.validate().is_err());

        let no_token = ProjectConfig::new("demo".to_string(), String::new());
        assert!(no_token.validate().is_err());

        let bad_url = ok.clone().with_base_url("scrapbox.io".to_string());
        assert!(bad_url.validate().is_err());

        let slow = ok.with_debounce_ms(60_000);
        assert!(slow.validate().is_err());
    }

    #[test]
    fn test_base_url_trims_trailing_slash() {
        let config = ProjectConfig::new("demo".to_string(), "tok".to_string())
            .with_base_url("http://localhost:8080/".to_string());
        assert_eq!(config.base_url(), "http://localhost:8080");
    }
}
