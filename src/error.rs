//! Application error types.
//!
//! Every failure reaching the dashboard is normalized into [`AppError`] once,
//! at the client boundary, so callers see a single error vocabulary. The
//! client-facing variants display exactly the message a user should read.

use serde::Serialize;
use thiserror::Error;

/// Message used when no response was received from the backend.
pub const UNREACHABLE_MESSAGE: &str = "Unable to connect to server. Please check your connection.";

/// Message used for HTTP 404 responses.
pub const NOT_FOUND_MESSAGE: &str = "Resource not found";

/// Message used for HTTP 500 responses.
pub const SERVER_ERROR_MESSAGE: &str = "Server error. Please try again later.";

/// Application-level errors.
///
/// All variants serialize to a structured JSON object for the dashboard API.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum AppError {
    /// No response was received (connection refused, DNS failure, timeout).
    #[error("{}", UNREACHABLE_MESSAGE)]
    NetworkUnreachable {
        #[serde(skip_serializing_if = "Option::is_none")]
        cause: Option<String>,
    },

    /// Backend answered 404.
    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound {
        #[serde(skip_serializing_if = "Option::is_none")]
        endpoint: Option<String>,
    },

    /// Backend answered 500.
    #[error("{}", SERVER_ERROR_MESSAGE)]
    ServerError {
        #[serde(skip_serializing_if = "Option::is_none")]
        endpoint: Option<String>,
    },

    /// Backend error body carried a structured `message` field.
    #[error("{message}")]
    Validation {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
    },

    /// Any other failure, passed through with its original text.
    #[error("{message}")]
    Http {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
    },

    /// A successful response could not be decoded.
    #[error("Failed to parse response: {message}")]
    Decode { message: String },

    /// Invalid configuration value.
    #[error("Invalid configuration for {variable}: {message}")]
    Config { variable: String, message: String },

    /// Internal application error.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    /// Create a network-unreachable error with the underlying cause.
    pub fn network_unreachable(cause: impl Into<String>) -> Self {
        Self::NetworkUnreachable {
            cause: Some(cause.into()),
        }
    }

    /// Create a not found error for an endpoint.
    pub fn not_found(endpoint: impl Into<String>) -> Self {
        Self::NotFound {
            endpoint: Some(endpoint.into()),
        }
    }

    /// Create a server error for an endpoint.
    pub fn server_error(endpoint: impl Into<String>) -> Self {
        Self::ServerError {
            endpoint: Some(endpoint.into()),
        }
    }

    /// Create a validation error from a backend-supplied message.
    pub fn validation(message: impl Into<String>, status_code: u16) -> Self {
        Self::Validation {
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Create a pass-through HTTP error.
    pub fn http(message: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
            status_code: None,
        }
    }

    /// Create a pass-through HTTP error with status code.
    pub fn http_status(message: impl Into<String>, status_code: u16) -> Self {
        Self::Http {
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a configuration error naming the offending variable.
    pub fn config(variable: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            variable: variable.into(),
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if no response was received.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::NetworkUnreachable { .. })
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() || err.is_request() {
            Self::network_unreachable(err.to_string())
        } else if err.is_decode() {
            Self::decode(err.to_string())
        } else {
            Self::http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_messages() {
        assert_eq!(AppError::not_found("/reviews/9").to_string(), "Resource not found");
        assert_eq!(
            AppError::server_error("/reviews/stats").to_string(),
            "Server error. Please try again later."
        );
        assert_eq!(
            AppError::network_unreachable("connection refused").to_string(),
            "Unable to connect to server. Please check your connection."
        );
        assert_eq!(
            AppError::validation("page size too large", 400).to_string(),
            "page size too large"
        );
    }

    #[test]
    fn test_http_passthrough_keeps_original_text() {
        let err = AppError::http_status("Request failed with status code 418", 418);
        assert_eq!(err.to_string(), "Request failed with status code 418");
    }

    #[test]
    fn test_error_serialization() {
        let err = AppError::validation("bad input", 400);
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"type\":\"Validation\""));
        assert!(json.contains("\"status_code\":400"));
    }

    #[test]
    fn test_optional_fields_not_serialized() {
        let err = AppError::NetworkUnreachable { cause: None };
        let json = serde_json::to_string(&err).unwrap();
        assert!(!json.contains("cause"));
    }

    #[test]
    fn test_config_display() {
        let err = AppError::config("CODESAGE_POLL_INTERVAL_SECS", "must be a positive integer");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for CODESAGE_POLL_INTERVAL_SECS: must be a positive integer"
        );
    }
}
