//! Application configuration management
//!
//! Request settings come from built-in defaults, optionally layered with a
//! TOML settings file and per-run command line overrides. The bearer token is
//! only ever read from the environment.
//! All configuration is validated at startup.

use crate::core::constants::{API_KEY_ENV, defaults};
use anyhow::{Context, Result, bail};
use reqwest::Url;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// `[api]` section
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub url: String,
    /// Request timeout in seconds; unset keeps the HTTP client default
    #[serde(default)]
    pub timeout: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            timeout: None,
        }
    }
}

/// `[model]` section
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model")]
    pub name: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_api_url() -> String {
    defaults::API_URL.to_string()
}

fn default_model() -> String {
    defaults::MODEL.to_string()
}

fn default_temperature() -> f32 {
    defaults::TEMPERATURE
}

fn default_max_tokens() -> u32 {
    defaults::MAX_TOKENS
}

fn default_log_level() -> String {
    defaults::LOG_LEVEL.to_string()
}

/// Settings file layout; every section and field is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Per-run overrides taken from the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub log_level: Option<String>,
}

/// Resolved application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer token, absent when `API_KEY` is unset
    pub api_key: Option<String>,

    /// Chat completion endpoint
    pub api_url: String,

    /// Request timeout in seconds
    pub request_timeout: Option<u64>,

    /// Model identifier sent with every request
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Logging level
    pub log_level: String,
}

impl Config {
    /// Build a configuration from parsed settings and an optional key
    ///
    /// # Errors
    ///
    /// Returns error if any setting is out of range.
    pub fn from_toml_config(toml_config: TomlConfig, api_key: Option<String>) -> Result<Self> {
        let config = Config {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            api_url: toml_config.api.url,
            request_timeout: toml_config.api.timeout,
            model: toml_config.model.name,
            temperature: toml_config.model.temperature,
            max_tokens: toml_config.model.max_tokens,
            log_level: toml_config.logging.level,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str, api_key: Option<String>) -> Result<Self> {
        let toml_config: TomlConfig =
            toml::from_str(content).context("Failed to parse TOML configuration")?;
        Self::from_toml_config(toml_config, api_key)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The TOML file cannot be read or parsed
    /// - Configuration values are invalid
    pub fn from_file<P: AsRef<Path>>(path: P, api_key: Option<String>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).with_context(|| {
            format!("Failed to read configuration file {}", path.display())
        })?;
        Self::from_toml_str(&content, api_key)
            .with_context(|| format!("Invalid configuration file {}", path.display()))
    }

    /// Load configuration from the environment and an optional settings file
    ///
    /// An explicit `config_path` must exist. Without one, `summarizer.toml`
    /// in the working directory is used when present and built-in defaults
    /// otherwise. The API key is read from `API_KEY`.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).ok();

        match config_path {
            Some(path) => Self::from_file(path, api_key),
            None => {
                let default_path = Path::new(defaults::CONFIG_FILE);
                if default_path.is_file() {
                    debug!("Using settings file {}", default_path.display());
                    Self::from_file(default_path, api_key)
                } else {
                    Self::from_toml_config(TomlConfig::default(), api_key)
                }
            }
        }
    }

    /// Apply command line overrides and re-validate
    pub fn with_overrides(mut self, overrides: Overrides) -> Result<Self> {
        if let Some(model) = overrides.model {
            self.model = model;
        }
        if let Some(temperature) = overrides.temperature {
            self.temperature = temperature;
        }
        if let Some(max_tokens) = overrides.max_tokens {
            self.max_tokens = max_tokens;
        }
        if let Some(log_level) = overrides.log_level {
            self.log_level = log_level;
        }
        self.validate()?;
        Ok(self)
    }

    /// The bearer token
    ///
    /// # Errors
    ///
    /// Returns error if `API_KEY` was not set or is blank.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .with_context(|| format!("{API_KEY_ENV} environment variable is not set"))
    }

    /// Check that every setting is usable
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api_url)
            .with_context(|| format!("Invalid API URL: {}", self.api_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("API URL must use http or https: {}", self.api_url);
        }

        if self.model.trim().is_empty() {
            bail!("Model name must not be empty");
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            bail!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            );
        }

        if self.max_tokens == 0 {
            bail!("max_tokens must be greater than zero");
        }

        if self.request_timeout == Some(0) {
            bail!("Request timeout must be greater than zero seconds");
        }

        Ok(())
    }
}
