#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for docaudit
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/docaudit/config.toml)
//! - Environment variables
//! - CLI flags (applied by the binary)

pub mod constants;
pub mod resources_semaphore;

pub use resources_semaphore::{acquire_semaphore_permit, create_semaphore};

use docaudit_errors::{ConfigError, Error};
use docaudit_types::ColorChoice;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub verify: VerifyConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub input: InputConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeneralConfig {
    #[serde(default)]
    pub color: ColorChoice,
}

/// Verification engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyConfig {
    /// Maximum probes in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default = "default_timeout")]
    pub timeout: u64, // seconds, per attempt
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    #[serde(default)]
    pub jitter_factor: f64,
    /// Treat 5xx responses like transport failures
    #[serde(default)]
    pub retry_server_errors: bool,
}

/// Remote object store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_suffix")]
    pub suffix: String,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64, // seconds
    #[serde(default = "default_pool_idle_timeout")]
    pub pool_idle_timeout: u64, // seconds
    #[serde(default = "default_pool_max_idle_per_host")]
    pub pool_max_idle_per_host: usize,
}

/// Report output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

/// Input discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// State codes to process; empty means every file
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Header line skipped at the top of an input file
    #[serde(default = "default_id_column")]
    pub id_column: String,
}

// Default implementations

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            concurrency: constants::DEFAULT_CONCURRENCY,
            timeout: constants::DEFAULT_TIMEOUT_SECS,
            max_attempts: constants::DEFAULT_MAX_ATTEMPTS,
            retry_delay_ms: constants::DEFAULT_RETRY_DELAY_MS,
            backoff_multiplier: 1.0,
            jitter_factor: 0.0,
            retry_server_errors: false,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: constants::DEFAULT_BASE_URL.to_string(),
            suffix: constants::DEFAULT_SUFFIX.to_string(),
            user_agent: None,
            connect_timeout: default_connect_timeout(),
            pool_idle_timeout: default_pool_idle_timeout(),
            pool_max_idle_per_host: default_pool_max_idle_per_host(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            states: Vec::new(),
            extensions: default_extensions(),
            id_column: default_id_column(),
        }
    }
}

// Default value functions for serde
fn default_concurrency() -> usize {
    constants::DEFAULT_CONCURRENCY
}

fn default_timeout() -> u64 {
    constants::DEFAULT_TIMEOUT_SECS
}

fn default_max_attempts() -> u32 {
    constants::DEFAULT_MAX_ATTEMPTS
}

fn default_retry_delay_ms() -> u64 {
    constants::DEFAULT_RETRY_DELAY_MS
}

fn default_backoff_multiplier() -> f64 {
    1.0
}

fn default_base_url() -> String {
    constants::DEFAULT_BASE_URL.to_string()
}

fn default_suffix() -> String {
    constants::DEFAULT_SUFFIX.to_string()
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_pool_idle_timeout() -> u64 {
    90
}

fn default_pool_max_idle_per_host() -> usize {
    constants::DEFAULT_CONCURRENCY
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(constants::DEFAULT_OUTPUT_DIR)
}

fn default_extensions() -> Vec<String> {
    constants::DEFAULT_INPUT_EXTENSIONS
        .iter()
        .map(|ext| (*ext).to_string())
        .collect()
}

fn default_id_column() -> String {
    constants::DEFAULT_ID_COLUMN.to_string()
}

impl VerifyConfig {
    /// Per-attempt request timeout
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Pause before the first retry
    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("docaudit").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            tracing::debug!(path = %config_path.display(), "loading config file");
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        if let Some(value) = env_parse::<usize>("DOCAUDIT_CONCURRENCY")? {
            self.verify.concurrency = value;
        }

        if let Some(value) = env_parse::<u64>("DOCAUDIT_TIMEOUT")? {
            self.verify.timeout = value;
        }

        if let Some(value) = env_parse::<u32>("DOCAUDIT_MAX_ATTEMPTS")? {
            self.verify.max_attempts = value;
        }

        if let Some(value) = env_parse::<u64>("DOCAUDIT_RETRY_DELAY_MS")? {
            self.verify.retry_delay_ms = value;
        }

        if let Ok(base_url) = std::env::var("DOCAUDIT_BASE_URL") {
            self.store.base_url = base_url;
        }

        if let Ok(dir) = std::env::var("DOCAUDIT_OUTPUT_DIR") {
            self.output.dir = PathBuf::from(dir);
        }

        // DOCAUDIT_STATES=GA,IA,WV
        if let Ok(states) = std::env::var("DOCAUDIT_STATES") {
            self.input.states = parse_state_list(&states);
        }

        Ok(())
    }

    /// Check values that would make a run meaningless
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid field.
    pub fn validate(&self) -> Result<(), Error> {
        if self.verify.concurrency == 0 {
            return Err(invalid("verify.concurrency", "0"));
        }
        if self.verify.max_attempts == 0 {
            return Err(invalid("verify.max_attempts", "0"));
        }
        if self.verify.timeout == 0 {
            return Err(invalid("verify.timeout", "0"));
        }
        if self.verify.backoff_multiplier.is_nan() || self.verify.backoff_multiplier < 1.0 {
            return Err(invalid(
                "verify.backoff_multiplier",
                &self.verify.backoff_multiplier.to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.verify.jitter_factor) {
            return Err(invalid(
                "verify.jitter_factor",
                &self.verify.jitter_factor.to_string(),
            ));
        }
        if self.store.base_url.trim().is_empty() {
            return Err(invalid("store.base_url", ""));
        }
        Ok(())
    }
}

/// Split a comma-separated list of state codes, upper-casing each entry
#[must_use]
pub fn parse_state_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_ascii_uppercase)
        .collect()
}

fn env_parse<T: std::str::FromStr>(var: &str) -> Result<Option<T>, Error> {
    match std::env::var(var) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| invalid(var, &value)),
        Err(_) => Ok(None),
    }
}

fn invalid(field: &str, value: &str) -> Error {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
    .into()
}
