//! Centralized error types for Skycast.
//!
//! Each error knows how to describe itself to the user through
//! `user_message()`, while `Display` keeps the technical detail for logs.

use thiserror::Error;

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Clone, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again."
            }
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_non_empty() {
        let errors = [
            NetworkError::Timeout,
            NetworkError::InvalidResponse("bad json".into()),
            NetworkError::ConnectionFailed("refused".into()),
        ];

        for err in errors {
            assert!(!err.user_message().is_empty(), "empty message for {err:?}");
        }
    }

    #[test]
    fn test_connection_failure_message() {
        let err = NetworkError::ConnectionFailed("refused".into());
        assert_eq!(
            err.user_message(),
            "Unable to connect. Check your internet connection."
        );
    }

    #[test]
    fn test_config_error_messages() {
        assert_eq!(
            ConfigError::Invalid("weather.timeout_secs".into()).user_message(),
            "Invalid configuration. Check your settings."
        );
        assert!(ConfigError::ParseError("line 1".into())
            .user_message()
            .contains("malformed"));
    }
}
