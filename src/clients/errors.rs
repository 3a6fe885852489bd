//! Error types for Atomic API operations.
//!
//! Every failure surfaced by the SDK is an [`ApiError`]. Callers branch on
//! [`ApiError::kind`] rather than on individual variants when they only care
//! about the failure class.
//!
//! - [`HttpResponseError`]: The details of a non-2xx response
//! - [`InvalidHttpRequestError`]: A request rejected before it was sent
//! - [`ApiError`]: Unified error type for every SDK operation
//! - [`ErrorKind`]: The failure class of an [`ApiError`]
//!
//! # Example
//!
//! ```rust,ignore
//! use atomic_api::{ApiError, ErrorKind};
//!
//! match client.sites().get(12345, false).await {
//!     Ok(site) => println!("Found {}", site.domain_name),
//!     Err(e) if e.kind() == ErrorKind::NotFound => println!("No such site"),
//!     Err(ApiError::RateLimited { retry_after, .. }) => {
//!         println!("Slow down, retry after {:?}", retry_after);
//!     }
//!     Err(e) => println!("Request failed: {e}"),
//! }
//! ```

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::rest::JobState;

/// Details of a non-successful response from the Atomic API.
///
/// `message` is extracted from the response body when the server sent one,
/// otherwise it is `"HTTP <code> <reason>"`. The raw body is preserved
/// verbatim for diagnostics.
///
/// # Example
///
/// ```rust
/// use atomic_api::clients::HttpResponseError;
///
/// let error = HttpResponseError {
///     code: 404,
///     message: "Site not found".to_string(),
///     body: r#"{"message":"Site not found"}"#.to_string(),
///     request_id: Some("abc-123".to_string()),
/// };
///
/// assert_eq!(error.to_string(), "Site not found (HTTP 404)");
/// ```
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message} (HTTP {code})")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Message extracted from the response body.
    pub message: String,
    /// The raw response body.
    pub body: String,
    /// Reference ID for error reporting (from X-Request-Id header).
    pub request_id: Option<String>,
}

/// Error returned when a request fails validation before it is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A GET request was given a body.
    #[error("Cannot send a body with a {method} request.")]
    BodyNotAllowed {
        /// The HTTP method of the request.
        method: String,
    },

    /// The request path is empty.
    #[error("Request path cannot be empty.")]
    EmptyPath,

    /// A form or multipart field has an empty name.
    #[error("Form field names cannot be empty.")]
    EmptyFieldName,

    /// A required argument was not supplied.
    #[error("Missing required argument '{argument}'.")]
    MissingArgument {
        /// The name of the argument.
        argument: String,
    },

    /// An argument was supplied with a value the API does not accept.
    #[error("Invalid value for '{argument}': {reason}")]
    InvalidArgument {
        /// The name of the argument.
        argument: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// The failure class of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The requested entity does not exist.
    NotFound,
    /// The request was malformed or rejected as invalid.
    InvalidRequest,
    /// The credentials were rejected or lack permission.
    AuthenticationOrAuthorization,
    /// The server throttled the request.
    RateLimited,
    /// The server failed to process the request.
    ServerError,
    /// No response was received (connection failure or timeout).
    TransportFailure,
    /// A response payload did not have the expected shape.
    SchemaValidation,
    /// A job did not reach a terminal state before the deadline.
    Timeout,
    /// The operation is not available for this handle.
    UnsupportedOperation,
    /// Any other API failure.
    GenericApiError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotFound => "not_found",
            Self::InvalidRequest => "invalid_request",
            Self::AuthenticationOrAuthorization => "authentication",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::TransportFailure => "transport_failure",
            Self::SchemaValidation => "schema_validation",
            Self::Timeout => "timeout",
            Self::UnsupportedOperation => "unsupported_operation",
            Self::GenericApiError => "api_error",
        };
        f.write_str(name)
    }
}

/// Unified error type for every Atomic API operation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API answered 404, or the body signalled a missing entity.
    #[error("Not found: {0}")]
    NotFound(HttpResponseError),

    /// The API rejected the request as malformed (400, 422, or body signal).
    #[error("Invalid request: {0}")]
    InvalidRequest(HttpResponseError),

    /// The API rejected the credentials (401 or 403).
    #[error("Authentication failed: {0}")]
    Authentication(HttpResponseError),

    /// The API throttled the request (429).
    #[error("Rate limited: {error}")]
    RateLimited {
        /// The response details.
        error: HttpResponseError,
        /// How long the server asked the caller to wait, if it said.
        retry_after: Option<Duration>,
    },

    /// The API failed to process the request (5xx).
    #[error("Server error: {0}")]
    Server(HttpResponseError),

    /// Any other non-2xx response.
    #[error("API error: {0}")]
    Api(HttpResponseError),

    /// No response was received.
    #[error("Transport failure: {message}")]
    Transport {
        /// Description of the failure.
        message: String,
        /// Whether the request exceeded its timeout.
        timed_out: bool,
        /// The underlying HTTP library error.
        #[source]
        source: reqwest::Error,
    },

    /// A payload did not match the expected shape or record schema.
    #[error("Schema validation failed for {type_name}: {message}")]
    SchemaValidation {
        /// The record type or payload kind that was expected.
        type_name: String,
        /// The first violation found.
        message: String,
    },

    /// A job wait reached its deadline before the job finished.
    #[error("Job {job_id} did not finish within {waited:?} (last state: {last_state})")]
    Timeout {
        /// The identifier of the job.
        job_id: String,
        /// How long the caller waited.
        waited: Duration,
        /// The last state observed before giving up.
        last_state: JobState,
    },

    /// The operation is not supported by this handle.
    #[error("Operation '{operation}' is not supported for job {job_id}")]
    UnsupportedOperation {
        /// The operation that was attempted.
        operation: &'static str,
        /// The identifier of the job.
        job_id: String,
    },

    /// The request failed validation before it was sent.
    #[error(transparent)]
    InvalidHttpRequest(#[from] InvalidHttpRequestError),
}

impl ApiError {
    /// Returns the failure class of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidRequest(_) | Self::InvalidHttpRequest(_) => ErrorKind::InvalidRequest,
            Self::Authentication(_) => ErrorKind::AuthenticationOrAuthorization,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::Server(_) => ErrorKind::ServerError,
            Self::Api(_) => ErrorKind::GenericApiError,
            Self::Transport { .. } => ErrorKind::TransportFailure,
            Self::SchemaValidation { .. } => ErrorKind::SchemaValidation,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::UnsupportedOperation { .. } => ErrorKind::UnsupportedOperation,
        }
    }

    /// Returns the response details, if this error came from an API response.
    #[must_use]
    pub const fn response(&self) -> Option<&HttpResponseError> {
        match self {
            Self::NotFound(e)
            | Self::InvalidRequest(e)
            | Self::Authentication(e)
            | Self::Server(e)
            | Self::Api(e)
            | Self::RateLimited { error: e, .. } => Some(e),
            _ => None,
        }
    }

    /// Returns the HTTP status code, if this error came from an API response.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.response().map(|e| e.code)
    }

    /// Returns the `X-Request-Id` of the failed response, if the server sent one.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.response().and_then(|e| e.request_id.as_deref())
    }

    /// Returns `true` if the error was a transport timeout.
    #[must_use]
    pub const fn is_timed_out(&self) -> bool {
        matches!(self, Self::Transport { timed_out: true, .. } | Self::Timeout { .. })
    }

    pub(crate) fn schema<T: ?Sized>(message: impl Into<String>) -> Self {
        Self::SchemaValidation {
            type_name: short_type_name::<T>(),
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(source: reqwest::Error) -> Self {
        Self::Transport {
            message: source.to_string(),
            timed_out: source.is_timeout(),
            source,
        }
    }
}

/// Returns the last path segment of a type name (`Site` rather than
/// `atomic_api::rest::resources::sites::Site`). Generic arguments are kept.
pub(crate) fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    let short = base.rsplit("::").next().unwrap_or(base);
    format!("{short}{}", &full[base.len()..])
}

// Verify error types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiError>();
    assert_send_sync::<HttpResponseError>();
};
