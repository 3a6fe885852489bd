//! Validated newtype wrappers for configuration values.
//!
//! These wrappers validate their contents on construction so that an invalid
//! credential or endpoint is rejected before the first request is sent.

use crate::error::ConfigError;
use std::fmt;

/// A validated Atomic API key.
///
/// The key is sent in the `Auth` header of every request. Its `Debug`
/// output is masked so it does not leak into logs.
///
/// # Example
///
/// ```rust
/// use atomic_api::ApiKey;
///
/// let key = ApiKey::new("my-api-key").unwrap();
/// assert_eq!(key.as_ref(), "my-api-key");
/// assert_eq!(format!("{:?}", key), "ApiKey(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a new validated API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if the key is empty or blank.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for ApiKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(*****)")
    }
}

/// A validated client identifier (client name or numeric ID).
///
/// The identifier is embedded as a path segment in most endpoints, so it
/// may not contain path or query delimiters.
///
/// # Example
///
/// ```rust
/// use atomic_api::ClientId;
///
/// let client = ClientId::new("my-agency").unwrap();
/// assert_eq!(client.as_ref(), "my-agency");
/// assert!(ClientId::new("my/agency").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClientId(String);

impl ClientId {
    /// Creates a new validated client identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyClientId`] if the identifier is empty, or
    /// [`ConfigError::InvalidClientId`] if it contains `/`, `?`, `#` or
    /// whitespace.
    pub fn new(client_id: impl Into<String>) -> Result<Self, ConfigError> {
        let client_id = client_id.into().trim().to_string();
        if client_id.is_empty() {
            return Err(ConfigError::EmptyClientId);
        }
        if client_id
            .chars()
            .any(|c| matches!(c, '/' | '?' | '#') || c.is_whitespace())
        {
            return Err(ConfigError::InvalidClientId { client_id });
        }
        Ok(Self(client_id))
    }
}

impl AsRef<str> for ClientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated API base URL.
///
/// The URL must carry a scheme and a host. A trailing slash is trimmed so
/// that endpoint paths (which always start with `/`) can be appended
/// directly.
///
/// # Example
///
/// ```rust
/// use atomic_api::BaseUrl;
///
/// let url = BaseUrl::new("http://localhost:8080/api/v1.0/").unwrap();
/// assert_eq!(url.as_ref(), "http://localhost:8080/api/v1.0");
/// assert_eq!(url.scheme(), "http");
/// assert_eq!(url.host_name(), "localhost");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    url: String,
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

impl BaseUrl {
    /// The production Atomic API endpoint.
    pub const DEFAULT: &'static str = "https://atomic-api.wordpress.com/api/v1.0";

    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the scheme or host is
    /// missing, or if the URL carries a query string or fragment.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into().trim().trim_end_matches('/').to_string();
        let invalid = || ConfigError::InvalidBaseUrl { url: url.clone() };

        let scheme_end = url.find("://").ok_or_else(invalid)?;
        let scheme = &url[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }

        let host_start = scheme_end + 3;
        if host_start >= url.len() || url.contains(['?', '#']) {
            return Err(invalid());
        }

        let remainder = &url[host_start..];
        let host_end = remainder
            .find([':', '/'])
            .map_or(url.len(), |i| host_start + i);
        if host_end == host_start {
            return Err(invalid());
        }

        Ok(Self {
            url,
            scheme_end,
            host_start,
            host_end,
        })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.url[self.host_start..self.host_end]
    }

    /// Joins an endpoint path onto the base URL.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.url)
        } else {
            format!("{}/{path}", self.url)
        }
    }
}

impl Default for BaseUrl {
    fn default() -> Self {
        let url = Self::DEFAULT.to_string();
        Self {
            scheme_end: 5,
            host_start: 8,
            host_end: 8 + "atomic-api.wordpress.com".len(),
            url,
        }
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}
