//! Configuration error types for the Atomic API SDK.
//!
//! All configuration constructors return `Result<T, ConfigError>` so that a
//! misconfigured client is rejected before any request is made.
//!
//! # Example
//!
//! ```rust
//! use atomic_api::{ApiKey, ConfigError};
//!
//! let result = ApiKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiKey)));
//! ```

use thiserror::Error;

/// Errors that can occur while building the SDK configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API key cannot be empty.
    #[error("API key cannot be empty. Please provide a valid Atomic API key.")]
    EmptyApiKey,

    /// Client identifier cannot be empty.
    #[error("Client identifier cannot be empty. Please provide your client name or ID.")]
    EmptyClientId,

    /// Client identifier contains characters that cannot appear in a path segment.
    #[error("Invalid client identifier '{client_id}'. It must not contain '/', '?' or whitespace.")]
    InvalidClientId {
        /// The identifier that was provided.
        client_id: String,
    },

    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. Please provide a URL with scheme and host (e.g., 'https://atomic-api.wordpress.com/api/v1.0').")]
    InvalidBaseUrl {
        /// The URL that was provided.
        url: String,
    },

    /// A timeout of zero would fail every request.
    #[error("Timeout for '{field}' must be greater than zero.")]
    ZeroTimeout {
        /// The timeout setting that was zero.
        field: &'static str,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// The underlying HTTP client could not be created.
    #[error("Failed to initialise HTTP client: {reason}")]
    HttpClientInit {
        /// The reason reported by the HTTP library.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_api_key_error_message() {
        let message = ConfigError::EmptyApiKey.to_string();
        assert!(message.contains("API key cannot be empty"));
    }

    #[test]
    fn test_invalid_client_id_includes_value() {
        let error = ConfigError::InvalidClientId {
            client_id: "bad/client".to_string(),
        };
        assert!(error.to_string().contains("bad/client"));
    }

    #[test]
    fn test_missing_required_field_error_message() {
        let error = ConfigError::MissingRequiredField { field: "api_key" };
        let message = error.to_string();
        assert!(message.contains("api_key"));
        assert!(message.contains("must be set"));
    }

    #[test]
    fn test_zero_timeout_names_field() {
        let error = ConfigError::ZeroTimeout { field: "timeout" };
        assert!(error.to_string().contains("'timeout'"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::EmptyClientId;
        let _: &dyn std::error::Error = &error;
    }
}
