//! Simple CLI configuration loader for scrap
//!
//! Implements single-source priority loading with flag overrides:
//! 1. --config file/dir (highest priority)
//! 2. Current working directory: ./scrap.json or ./.scrap/config.json
//! 3. Git repository root: <repo_root>/.scrap/config.json
//! 4. XDG config: $XDG_CONFIG_HOME/scrap/config.json or ~/.config/scrap/config.json
//! 5. Flags and environment variables only (no files)
//!
//! Flags (which clap also fills from `SCRAP_*` environment variables) override
//! whatever the file provided.

use anyhow::{anyhow, Context, Result};
use scrap_core::config::{DEFAULT_BASE_URL, DEFAULT_DEBOUNCE_MS};
use scrap_core::ProjectConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Raw configuration file format (simple single-file schema)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawConfig {
    /// Project name
    pub project: Option<String>,
    /// Session token (can be "env:VAR_NAME" for environment variable)
    pub token: Option<String>,
    /// Base URL (optional, defaults to https://scrapbox.io)
    pub base_url: Option<String>,
    /// Debounce interval in milliseconds (optional)
    pub debounce_ms: Option<u64>,
    /// Page cache directory (optional)
    pub cache_dir: Option<PathBuf>,
}

/// CLI configuration loader
pub struct CliConfigLoader {
    /// Override config file/directory path
    config_override: Option<PathBuf>,
    /// Directory the search starts from (current directory when unset)
    search_root: Option<PathBuf>,
    /// Flag overrides
    project_override: Option<String>,
    token_override: Option<String>,
    base_url_override: Option<String>,
    debounce_override: Option<u64>,
    cache_dir_override: Option<PathBuf>,
}

impl CliConfigLoader {
    /// Create a new loader
    pub fn new() -> Self {
        Self {
            config_override: None,
            search_root: None,
            project_override: None,
            token_override: None,
            base_url_override: None,
            debounce_override: None,
            cache_dir_override: None,
        }
    }

    /// Set config file/directory override
    pub fn with_config_override(mut self, path: PathBuf) -> Self {
        self.config_override = Some(path);
        self
    }

    /// Start the config search from `dir` instead of the current directory
    pub fn with_search_root(mut self, dir: PathBuf) -> Self {
        self.search_root = Some(dir);
        self
    }

    /// Set project override
    pub fn with_project_override(mut self, project: String) -> Self {
        self.project_override = Some(project);
        self
    }

    /// Set session token override
    pub fn with_token_override(mut self, token: String) -> Self {
        self.token_override = Some(token);
        self
    }

    /// Set base URL override
    pub fn with_base_url_override(mut self, base_url: String) -> Self {
        self.base_url_override = Some(base_url);
        self
    }

    /// Set debounce override
    pub fn with_debounce_override(mut self, debounce_ms: u64) -> Self {
        self.debounce_override = Some(debounce_ms);
        self
    }

    /// Set cache directory override
    pub fn with_cache_dir_override(mut self, cache_dir: PathBuf) -> Self {
        self.cache_dir_override = Some(cache_dir);
        self
    }

    /// Load and resolve configuration
    pub async fn load(&self) -> Result<ProjectConfig> {
        // Step 1: Find and load base configuration
        let mut config = if let Some(override_path) = &self.config_override {
            // Use explicit config override
            self.load_from_path(override_path).await.with_context(|| {
                format!(
                    "Failed to load config from override path: {}",
                    override_path.display()
                )
            })?
        } else {
            // Search in priority order
            self.search_and_load().await?.unwrap_or_default()
        };

        // Step 2: Apply flag overrides
        if let Some(project) = &self.project_override {
            config.project = Some(project.clone());
        }
        if let Some(token) = &self.token_override {
            config.token = Some(token.clone());
        }
        if let Some(base_url) = &self.base_url_override {
            config.base_url = Some(base_url.clone());
        }
        if let Some(debounce_ms) = self.debounce_override {
            config.debounce_ms = Some(debounce_ms);
        }
        if let Some(cache_dir) = &self.cache_dir_override {
            config.cache_dir = Some(cache_dir.clone());
        }

        // Step 3: Resolve to final project config
        self.resolve_config(config)
    }

    /// Search for config in priority order
    async fn search_and_load(&self) -> Result<Option<RawConfig>> {
        let root = match &self.search_root {
            Some(root) => root.clone(),
            None => std::env::current_dir()?,
        };

        // 1. Search root
        if let Some(config) = self.try_load_dir(&root).await? {
            return Ok(Some(config));
        }

        // 2. Git repository root
        if let Some(git_root) = find_git_root(&root) {
            let config_path = git_root.join(".scrap").join("config.json");
            if config_path.exists() {
                return Ok(Some(self.load_file(&config_path).await?));
            }
        }

        // 3. XDG config directory
        if let Some(config_dir) = get_xdg_config_dir() {
            let config_path = config_dir.join("scrap").join("config.json");
            if config_path.exists() {
                return Ok(Some(self.load_file(&config_path).await?));
            }
        }

        Ok(None)
    }

    /// Try ./scrap.json, then ./.scrap/config.json
    async fn try_load_dir(&self, dir: &Path) -> Result<Option<RawConfig>> {
        let scrap_json = dir.join("scrap.json");
        if scrap_json.exists() {
            return Ok(Some(self.load_file(&scrap_json).await?));
        }

        let scrap_dir_config = dir.join(".scrap").join("config.json");
        if scrap_dir_config.exists() {
            return Ok(Some(self.load_file(&scrap_dir_config).await?));
        }

        Ok(None)
    }

    /// Load configuration from a specific path (file or directory)
    async fn load_from_path(&self, path: &Path) -> Result<RawConfig> {
        if path.is_file() {
            self.load_file(path).await
        } else if path.is_dir() {
            // Try config.json in the directory
            let config_file = path.join("config.json");
            if config_file.exists() {
                self.load_file(&config_file).await
            } else {
                Err(anyhow!(
                    "No config.json found in directory: {}",
                    path.display()
                ))
            }
        } else {
            Err(anyhow!("Config path does not exist: {}", path.display()))
        }
    }

    /// Load a single config file
    async fn load_file(&self, path: &Path) -> Result<RawConfig> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        tracing::debug!("Loaded config from {}", path.display());

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Resolve raw config to ProjectConfig
    fn resolve_config(&self, config: RawConfig) -> Result<ProjectConfig> {
        let project = config.project.ok_or_else(|| {
            anyhow!(
                "No project configured. \
                 Create a scrap.json file, pass --project or set SCRAP_PROJECT"
            )
        })?;

        let token = config.token.ok_or_else(|| {
            anyhow!(
                "No session token configured. \
                 Add \"token\" to scrap.json, pass --token or set SCRAP_TOKEN"
            )
        })?;

        // Resolve token (handle env: prefix)
        let token = if let Some(var_name) = token.strip_prefix("env:") {
            std::env::var(var_name)
                .with_context(|| format!("Environment variable not found: {}", var_name))?
        } else {
            token
        };

        let mut resolved = ProjectConfig::new(project, token)
            .with_base_url(config.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()))
            .with_debounce_ms(config.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS));
        if let Some(cache_dir) = config.cache_dir {
            resolved = resolved.with_cache_dir(cache_dir);
        }

        // Validate
        resolved
            .validate()
            .map_err(|e| anyhow!("Configuration validation failed: {}", e))?;

        Ok(resolved)
    }
}

impl Default for CliConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Find git repository root
fn find_git_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

/// Get XDG config directory
fn get_xdg_config_dir() -> Option<PathBuf> {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
}
