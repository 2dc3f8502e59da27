//! Configuration loading from TOML files

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::ads::DEFAULT_API_URL;
use crate::ads::client::Timeouts;
use crate::tags::SDSS_TAG;

const TOKEN_VAR: &str = "ADS_DEV_KEY";
const API_URL_VAR: &str = "ADS_API_URL";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub owner: OwnerConfig,
    pub output: OutputConfig,
    pub subset: SubsetConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(deserialize_with = "deserialize_env_var")]
    pub token: Option<String>,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var(API_URL_VAR).unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            token: std::env::var(TOKEN_VAR).ok().filter(|t| !t.is_empty()),
            connect_timeout_secs: 10,
            request_timeout_secs: 60,
        }
    }
}

impl ApiConfig {
    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            connect: Duration::from_secs(self.connect_timeout_secs),
            request: Duration::from_secs(self.request_timeout_secs),
        }
    }

    /// Bearer token; a missing token is a configuration error.
    pub fn require_token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .with_context(|| format!("{TOKEN_VAR} is not set in environment."))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OwnerConfig {
    /// Surname spellings that identify the site owner in author lists.
    pub surnames: Vec<String>,
    pub max_authors: usize,
}

impl Default for OwnerConfig {
    fn default() -> Self {
        Self {
            surnames: vec!["Villaseñor".to_string(), "Villasenor".to_string()],
            max_authors: 8,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub library: String,
    pub records: PathBuf,
    pub subset: PathBuf,
    pub metrics: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            library: "JIV".to_string(),
            records: PathBuf::from("_data/papers_all.yml"),
            subset: PathBuf::from("_data/papers_sdssv.yml"),
            metrics: PathBuf::from("_data/ads_metrics.yml"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SubsetConfig {
    pub enabled: bool,
    pub tag: String,
}

impl Default for SubsetConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            tag: SDSS_TAG.to_string(),
        }
    }
}

/// Deserialize a string that may contain environment variable reference like ${VAR}
fn deserialize_env_var<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| expand_env_var(&s)))
}

/// Expand ${VAR} to environment variable value
fn expand_env_var(s: &str) -> Option<String> {
    if let Some(var_name) = s.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
        std::env::var(var_name).ok()
    } else {
        Some(s.to_string())
    }
}

impl Config {
    /// Load configuration from `explicit`, or from the default locations.
    ///
    /// Search order:
    /// 1. ./ads-pubs.toml (current directory)
    /// 2. ~/.config/ads-pubs/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let local_config = PathBuf::from("ads-pubs.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "ads-pubs") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
