//! Error handling module for the advising client.
//!
//! Provides a single error type for every client operation, with mapping from
//! HTTP statuses and backend error bodies.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const HTTP_STATUS: &str = "HTTP_STATUS";
    pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
    pub const DECODE_ERROR: &str = "DECODE_ERROR";
    pub const IO_ERROR: &str = "IO_ERROR";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const STEP_FAILED: &str = "STEP_FAILED";
}

/// Client error type.
#[derive(Debug)]
pub enum ClientError {
    /// Backend answered 404
    NotFound(String),
    /// Backend answered 401 or 403
    Unauthorized(String),
    /// Any other non-success status
    Status { status: u16, message: String },
    /// Transport failure (connect, timeout, TLS)
    Network(String),
    /// Response body did not match the expected shape
    Decode(String),
    /// Local file access failed
    Io(String),
    /// Invalid configuration
    Config(String),
    /// Invalid input rejected before any request was sent
    Validation(String),
    /// A filter-option loading step failed; the remaining steps were not run
    StepFailed {
        step: &'static str,
        source: Box<ClientError>,
    },
}

impl ClientError {
    /// Build an error from a non-success HTTP status and its body.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string()
                } else {
                    trimmed.to_string()
                }
            });

        match status {
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Unauthorized(message),
            _ => ClientError::Status {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Get the HTTP status code associated with this error, if any.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            ClientError::NotFound(_) => Some(StatusCode::NOT_FOUND),
            ClientError::Unauthorized(_) => Some(StatusCode::UNAUTHORIZED),
            ClientError::Status { status, .. } => StatusCode::from_u16(*status).ok(),
            ClientError::StepFailed { source, .. } => source.status_code(),
            _ => None,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::NotFound(_) => codes::NOT_FOUND,
            ClientError::Unauthorized(_) => codes::UNAUTHORIZED,
            ClientError::Status { .. } => codes::HTTP_STATUS,
            ClientError::Network(_) => codes::NETWORK_ERROR,
            ClientError::Decode(_) => codes::DECODE_ERROR,
            ClientError::Io(_) => codes::IO_ERROR,
            ClientError::Config(_) => codes::CONFIG_ERROR,
            ClientError::Validation(_) => codes::VALIDATION_ERROR,
            ClientError::StepFailed { .. } => codes::STEP_FAILED,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            ClientError::NotFound(msg) => msg.clone(),
            ClientError::Unauthorized(msg) => msg.clone(),
            ClientError::Status { status, message } => format!("{} ({})", message, status),
            ClientError::Network(msg) => msg.clone(),
            ClientError::Decode(msg) => msg.clone(),
            ClientError::Io(msg) => msg.clone(),
            ClientError::Config(msg) => msg.clone(),
            ClientError::Validation(msg) => msg.clone(),
            ClientError::StepFailed { step, source } => {
                format!("step '{}' failed: {}", step, source)
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::StepFailed { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("HTTP error: {:?}", err);
        if err.is_decode() {
            ClientError::Decode(format!("Decode error: {}", err))
        } else if let Some(status) = err.status() {
            ClientError::from_status(status, "")
        } else {
            ClientError::Network(format!("Network error: {}", err))
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        ClientError::Decode(format!("JSON error: {}", err))
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("IO error: {:?}", err);
        ClientError::Io(format!("IO error: {}", err))
    }
}

/// Error body returned by the backend on failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Turn a 404 into `Ok(None)`, passing every other outcome through.
pub fn not_found_as_none<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ClientError::NotFound(msg)) => {
            tracing::debug!("Resource not found: {}", msg);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
