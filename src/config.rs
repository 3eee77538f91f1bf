//! Launcher configuration, read from a JSON file.
//!
//! Lookup order for the file: `APPLAUNCH_CONFIG`, then the first CLI argument,
//! then `applaunch.json` in the working directory. A missing file gives the
//! defaults; a corrupt one is logged and also gives the defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ConfigError;

pub const CONFIG_ENV: &str = "APPLAUNCH_CONFIG";
pub const CATALOG_URL_ENV: &str = "APPLAUNCH_CATALOG_URL";
pub const DEFAULT_CONFIG_FILE: &str = "applaunch.json";
pub const DEFAULT_CATALOG_URL: &str = "apps.json";
pub const DEFAULT_CACHE_GENERATION: &str = "launcher-v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    pub catalog_url: String,
    pub cache_dir: PathBuf,
    pub cache_generation: String,
    /// Resources fetched on first activation. Empty means just the catalog.
    pub precache: Vec<String>,
    pub user_agent: Option<String>,
    pub log_dir: Option<PathBuf>,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            cache_dir: default_cache_dir(),
            cache_generation: DEFAULT_CACHE_GENERATION.to_string(),
            precache: Vec::new(),
            user_agent: None,
            log_dir: None,
        }
    }
}

impl LauncherConfig {
    pub fn precache_urls(&self) -> Vec<String> {
        let mut urls = self.precache.clone();
        if !urls.iter().any(|url| url == &self.catalog_url) {
            urls.push(self.catalog_url.clone());
        }
        urls
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| self.cache_dir.clone())
    }

    pub fn resolve_path(cli_arg: Option<&str>) -> PathBuf {
        std::env::var(CONFIG_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .or_else(|| cli_arg.map(str::to_string))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default().with_env_overrides());
        }

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let config = match serde_json::from_str::<Self>(&raw) {
            Ok(config) => {
                info!(path = %path.display(), "config loaded");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "config is corrupt, using defaults");
                Self::default()
            }
        };
        Ok(config.with_env_overrides())
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(CATALOG_URL_ENV) {
            if !url.trim().is_empty() {
                self.catalog_url = url;
            }
        }
        self
    }
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("applaunch"))
        .unwrap_or_else(|| PathBuf::from(".applaunch-cache"))
}
