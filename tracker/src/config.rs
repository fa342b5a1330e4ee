//! Configuration loading
//!
//! Configuration is loaded from:
//! 1. Environment variable GH_TRACKER_CONFIG (path to a TOML file)
//! 2. ~/.gh-tracker/config.toml
//! 3. Default values
//!
//! GITHUB_API_URL overrides `github.api_url` after the file is read.

use anyhow::{Context, Result};
use github_api::client::{DEFAULT_API_URL, DEFAULT_MAX_PAGES, DEFAULT_PER_PAGE};
use github_api::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// GitHub API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Page size for list endpoints
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Stop following pagination links after this many pages
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Event store settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite file for activity events (default: ~/.gh-tracker/events.db)
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

fn default_max_pages() -> usize {
    DEFAULT_MAX_PAGES
}

fn default_user_agent() -> String {
    ClientConfig::default().user_agent
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            per_page: default_per_page(),
            max_pages: default_max_pages(),
            user_agent: default_user_agent(),
        }
    }
}

impl TrackerConfig {
    /// Load configuration from file or use defaults
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_path() {
            Some(path) if path.exists() => {
                tracing::info!("Loading config from: {}", path.display());
                Self::load_from_path(&path)?
            }
            _ => {
                tracing::debug!("No config file found, using defaults");
                Self::default()
            }
        };

        if let Ok(url) = std::env::var("GITHUB_API_URL") {
            config.github.api_url = url;
        }

        Ok(config)
    }

    /// Load from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config from {:?}", path))
    }

    fn find_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("GH_TRACKER_CONFIG") {
            return Some(PathBuf::from(path));
        }

        dirs::home_dir().map(|home| home.join(".gh-tracker").join("config.toml"))
    }

    /// Settings for [`github_api::GitHubClient`]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_url: self.github.api_url.clone(),
            per_page: self.github.per_page,
            max_pages: self.github.max_pages,
            user_agent: self.github.user_agent.clone(),
        }
    }

    /// Where the event store lives
    pub fn database_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.store.path {
            return Ok(path.clone());
        }
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".gh-tracker").join("events.db"))
    }
}
