//! Configuration management
//!
//! This module handles loading, validation, and management of the MVPForge
//! configuration. Configuration is stored in TOML format at
//! ~/.mvpforge/config.toml.
//!
//! # Configuration Sections
//!
//! - **core**: Log level and data directory
//! - **openrouter**: Generation service endpoint, model fallback chain,
//!   sampling parameters, and timeouts
//! - **ingest**: arXiv categories, fetch limits, and rate-limit cooldowns
//!
//! The OpenRouter API key is deliberately not part of the config file; it is
//! read from the `OPENROUTER_API_KEY` environment variable at startup.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur while loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config error: {0}")]
    Invalid(String),

    #[error("Missing environment variable: {0}")]
    MissingEnv(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Core engine settings
    #[serde(default)]
    pub core: CoreConfig,

    /// Generation service configuration
    #[serde(default)]
    pub openrouter: OpenRouterConfig,

    /// arXiv ingestion configuration
    #[serde(default)]
    pub ingest: IngestConfig,
}

/// Core engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Data directory path (supports ~ expansion)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

/// Generation service (OpenRouter) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenRouterConfig {
    /// Base URL for the chat completions API
    #[serde(default = "default_openrouter_base_url")]
    pub base_url: String,

    /// Ordered model fallback chain, tried first to last
    #[serde(default = "default_models")]
    pub models: Vec<String>,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Maximum tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Delay between attempts on distinct models, in seconds
    #[serde(default = "default_model_cooldown")]
    pub model_cooldown_secs: u64,
    // Note: API key comes from the OPENROUTER_API_KEY env var, not the config
}

/// arXiv ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Base URL for the arXiv Atom query API
    #[serde(default = "default_arxiv_base_url")]
    pub base_url: String,

    /// Categories to fetch, in order
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,

    /// Maximum papers fetched per category
    #[serde(default = "default_max_per_category")]
    pub max_per_category: usize,

    /// Delay between category fetches, in seconds (arXiv rate limits)
    #[serde(default = "default_category_cooldown")]
    pub category_cooldown_secs: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_ingest_timeout")]
    pub request_timeout_secs: u64,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("~/.mvpforge")
}

fn default_openrouter_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_models() -> Vec<String> {
    vec![
        "deepseek/deepseek-v3.2".to_string(),
        "minimax/minimax-m2.5".to_string(),
    ]
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    8000
}

fn default_request_timeout() -> u64 {
    300
}

fn default_model_cooldown() -> u64 {
    1
}

fn default_arxiv_base_url() -> String {
    "https://export.arxiv.org/api/query".to_string()
}

fn default_categories() -> Vec<String> {
    vec!["cs.LG".to_string(), "cs.MA".to_string()]
}

fn default_max_per_category() -> usize {
    25
}

fn default_category_cooldown() -> u64 {
    10
}

fn default_ingest_timeout() -> u64 {
    15
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            data_dir: default_data_dir(),
        }
    }
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            base_url: default_openrouter_base_url(),
            models: default_models(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout(),
            model_cooldown_secs: default_model_cooldown(),
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            base_url: default_arxiv_base_url(),
            categories: default_categories(),
            max_per_category: default_max_per_category(),
            category_cooldown_secs: default_category_cooldown(),
            request_timeout_secs: default_ingest_timeout(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            core: CoreConfig::default(),
            openrouter: OpenRouterConfig::default(),
            ingest: IngestConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location (~/.mvpforge/config.toml)
    ///
    /// If the configuration file doesn't exist, creates a default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file cannot be read or written
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load_or_create() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Self::create_default(&config_path)
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::Invalid(format!("Failed to read config file: {}", e)))?;

        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::Invalid(format!("Failed to parse config: {}", e)))?;

        config.validate_and_process()?;

        Ok(config)
    }

    /// Create default configuration and save to path
    fn create_default(path: &Path) -> Result<Self, ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Invalid(format!("Failed to create config directory: {}", e))
            })?;
        }

        let mut config = Self::default();
        config.validate_and_process()?;

        let toml_string = toml::to_string_pretty(&config)
            .map_err(|e| ConfigError::Invalid(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Invalid(format!("Failed to write config file: {}", e)))?;

        Ok(config)
    }

    /// Get the default configuration file path (~/.mvpforge/config.toml)
    fn default_config_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or_else(|| {
            ConfigError::Invalid("Could not determine home directory".to_string())
        })?;

        Ok(home.join(".mvpforge").join("config.toml"))
    }

    /// Validate configuration values and expand paths
    fn validate_and_process(&mut self) -> Result<(), ConfigError> {
        if self.openrouter.models.is_empty() {
            return Err(ConfigError::Invalid(
                "openrouter.models must list at least one model".to_string(),
            ));
        }
        if self.ingest.categories.is_empty() {
            return Err(ConfigError::Invalid(
                "ingest.categories must list at least one category".to_string(),
            ));
        }

        self.core.data_dir = expand_tilde(&self.core.data_dir)?;

        Ok(())
    }

    /// Path to the SQLite database file inside the data directory
    pub fn db_path(&self) -> PathBuf {
        self.core.data_dir.join("mvpforge.db")
    }

    /// Read the OpenRouter API key from the environment
    pub fn openrouter_api_key() -> Result<String, ConfigError> {
        std::env::var("OPENROUTER_API_KEY")
            .map_err(|_| ConfigError::MissingEnv("OPENROUTER_API_KEY".to_string()))
    }
}

/// Expand a leading ~ to the user's home directory
fn expand_tilde(path: &Path) -> Result<PathBuf, ConfigError> {
    let s = path.to_string_lossy();
    if let Some(rest) = s.strip_prefix("~") {
        let home = dirs::home_dir().ok_or_else(|| {
            ConfigError::Invalid("Could not determine home directory".to_string())
        })?;
        let rest = rest.trim_start_matches('/');
        return Ok(if rest.is_empty() {
            home
        } else {
            home.join(rest)
        });
    }
    Ok(path.to_path_buf())
}
