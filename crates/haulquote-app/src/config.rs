//! Configuration management for haulquote
//!
//! Config stored at: ~/.config/haulquote/config.json

use haulquote_types::{ConfigError, OutputFormat, Result};
use haulquote_vision::ModelRoster;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Environment variable holding the vision API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Vision API root override (optional)
    #[serde(default)]
    pub base_url: Option<String>,

    /// Model answering for the primary slot
    #[serde(default = "default_primary_model")]
    pub primary_model: String,

    /// Model answering for the secondary slot
    #[serde(default = "default_secondary_model")]
    pub secondary_model: String,

    /// Connect timeout for backend calls, in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Remote estimate endpoint used by `estimate --remote` when no URL is given
    #[serde(default)]
    pub proxy_upstream: Option<String>,

    /// Overall deadline for a proxied estimate, in seconds
    #[serde(default = "default_proxy_deadline_secs")]
    pub proxy_deadline_secs: u64,

    /// Default output format (json, table)
    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,
}

fn default_api_key_env() -> String {
    haulquote_vision::ai::gemini::DEFAULT_API_KEY_ENV.to_string()
}

fn default_primary_model() -> String {
    ModelRoster::default().primary
}

fn default_secondary_model() -> String {
    ModelRoster::default().secondary
}

fn default_connect_timeout_secs() -> u64 {
    30
}

fn default_proxy_deadline_secs() -> u64 {
    crate::proxy::DEFAULT_DEADLINE.as_secs()
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Table
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            base_url: None,
            primary_model: default_primary_model(),
            secondary_model: default_secondary_model(),
            connect_timeout_secs: default_connect_timeout_secs(),
            proxy_upstream: None,
            proxy_deadline_secs: default_proxy_deadline_secs(),
            output_format: default_output_format(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("haulquote");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load config from the default path, or fall back to defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from `path`, or fall back to defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveError(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn roster(&self) -> ModelRoster {
        ModelRoster {
            primary: self.primary_model.clone(),
            secondary: self.secondary_model.clone(),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn proxy_deadline(&self) -> Duration {
        Duration::from_secs(self.proxy_deadline_secs)
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Haulquote Configuration")?;
        writeln!(f, "=======================")?;
        writeln!(f)?;
        writeln!(f, "API key env:      {}", self.api_key_env)?;
        writeln!(
            f,
            "Base URL:         {}",
            self.base_url.as_deref().unwrap_or("(default)")
        )?;
        writeln!(f, "Primary model:    {}", self.primary_model)?;
        writeln!(f, "Secondary model:  {}", self.secondary_model)?;
        writeln!(f, "Connect timeout:  {}s", self.connect_timeout_secs)?;
        writeln!(
            f,
            "Proxy upstream:   {}",
            self.proxy_upstream.as_deref().unwrap_or("(none)")
        )?;
        writeln!(f, "Proxy deadline:   {}s", self.proxy_deadline_secs)?;
        writeln!(f, "Output format:    {}", self.output_format)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:      {}", path.display())?;
        }

        Ok(())
    }
}
