//! Client configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local use.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default EduVerse backend.
pub const DEFAULT_API_URL: &str = "https://edu-verse-q704.onrender.com";

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the EduVerse HTTP API (no trailing slash)
    pub api_base_url: String,
    /// Directory holding the persistent key-value store
    pub data_dir: PathBuf,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Emit JSON log lines instead of compact text
    pub json_logs: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let timeout_secs = match env::var("EDUVERSE_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("EDUVERSE_TIMEOUT_SECS", raw))?,
            Err(_) => 30,
        };

        Ok(Self {
            api_base_url: env::var("EDUVERSE_API_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            data_dir: env::var("EDUVERSE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".eduverse")),
            request_timeout: Duration::from_secs(timeout_secs),
            json_logs: env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        })
    }

    /// Config pointing at a local test backend.
    pub fn test_default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:9".to_string(),
            data_dir: PathBuf::from("target/eduverse-test"),
            request_timeout: Duration::from_secs(5),
            json_logs: false,
        }
    }

    /// Same config with a different API base URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Path of the JSON file backing the persistent store.
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("store.json")
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
