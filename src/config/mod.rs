//! Configuration module for the advising client.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::{ClientError, Result};

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the advising API, without trailing slash
    pub api_base_url: String,
    /// Optional API key sent as `x-api-key`
    pub api_key: Option<String>,
    /// Directory CSV exports are written to
    pub download_dir: PathBuf,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Department whose advisors populate the advisor menu
    pub coe_dept_code: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_base_url = env::var("ADVISING_API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5000".to_string())
            .trim_end_matches('/')
            .to_string();

        let api_key = env::var("ADVISING_API_KEY").ok().filter(|k| !k.is_empty());

        let download_dir = env::var("ADVISING_DOWNLOAD_DIR")
            .unwrap_or_else(|_| ".".to_string())
            .into();

        let timeout_secs = env::var("ADVISING_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .map_err(|e| {
                ClientError::Config(format!("Invalid ADVISING_REQUEST_TIMEOUT_SECS: {}", e))
            })?;

        let coe_dept_code =
            env::var("ADVISING_COE_DEPT_CODE").unwrap_or_else(|_| "COENG".to_string());

        let log_level = env::var("ADVISING_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            api_base_url,
            api_key,
            download_dir,
            request_timeout: Duration::from_secs(timeout_secs),
            coe_dept_code,
            log_level,
        })
    }

    /// Configuration pointing at the given base URL, everything else defaulted.
    pub fn with_base_url(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            download_dir: PathBuf::from("."),
            request_timeout: Duration::from_secs(30),
            coe_dept_code: "COENG".to_string(),
            log_level: "info".to_string(),
        }
    }
}
