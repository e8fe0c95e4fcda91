use std::path::PathBuf;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "Paperbrief";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default model identifier for the remote summarization endpoint.
pub const DEFAULT_MODEL: &str = "mixtral-8x7b-32768";

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_RETRIES: u32 = 3;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// Connection settings for the remote summarization service.
/// Sourced from the environment, never hard-coded.
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl SummaryConfig {
    /// Read configuration from `PAPERBRIEF_API_URL`, `PAPERBRIEF_API_KEY`,
    /// and the optional `PAPERBRIEF_MODEL`, `PAPERBRIEF_TIMEOUT_SECS`,
    /// `PAPERBRIEF_MAX_RETRIES` overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = std::env::var("PAPERBRIEF_API_URL")
            .map_err(|_| ConfigError::MissingEnv("PAPERBRIEF_API_URL"))?;
        let api_key = std::env::var("PAPERBRIEF_API_KEY")
            .map_err(|_| ConfigError::MissingEnv("PAPERBRIEF_API_KEY"))?;
        let model =
            std::env::var("PAPERBRIEF_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let timeout_secs = parse_env_var("PAPERBRIEF_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let max_retries = parse_env_var("PAPERBRIEF_MAX_RETRIES", DEFAULT_MAX_RETRIES)?;

        Ok(Self {
            api_url,
            api_key,
            model,
            timeout_secs,
            max_retries,
        })
    }

    /// Build a config directly (for tests and embedding callers).
    pub fn new(api_url: &str, api_key: &str) -> Self {
        Self {
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }
}

fn parse_env_var<T: std::str::FromStr>(
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value: raw }),
        Err(_) => Ok(default),
    }
}

/// Get the application data directory
/// ~/Paperbrief/ on all platforms (user-visible)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Paperbrief")
}

/// Path of the document database file
pub fn database_path() -> PathBuf {
    app_data_dir().join("documents.db")
}

/// Default tracing filter when RUST_LOG is not set
pub fn default_log_filter() -> String {
    "info,paperbrief=debug".to_string()
}
