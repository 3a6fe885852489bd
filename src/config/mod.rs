//! Configuration types for the Atomic API SDK.
//!
//! The main types in this module are:
//!
//! - [`AtomicConfig`]: The configuration shared by every resource client
//! - [`AtomicConfigBuilder`]: A builder for constructing [`AtomicConfig`] instances
//! - [`ApiKey`]: A validated API key with masked debug output
//! - [`ClientId`]: A validated client name or ID
//! - [`BaseUrl`]: A validated API base URL
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use atomic_api::{AtomicConfig, ApiKey, ClientId};
//!
//! let config = AtomicConfig::builder()
//!     .api_key(ApiKey::new("my-api-key").unwrap())
//!     .client_id(ClientId::new("my-agency").unwrap())
//!     .timeout(Duration::from_secs(10))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.timeout(), Duration::from_secs(10));
//! ```

mod newtypes;

use std::time::Duration;

pub use newtypes::{ApiKey, BaseUrl, ClientId};

use crate::error::ConfigError;

/// Default timeout applied to every API request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout applied to raw downloads such as backup archives.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Configuration for the Atomic API SDK.
///
/// Holds the credentials and connection parameters that every request
/// carries. A configuration is immutable once built; several independently
/// configured clients can coexist in one process.
///
/// `AtomicConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct AtomicConfig {
    api_key: ApiKey,
    client_id: ClientId,
    base_url: BaseUrl,
    timeout: Duration,
    download_timeout: Duration,
    user_agent_prefix: Option<String>,
}

impl AtomicConfig {
    /// Creates a new builder for constructing an `AtomicConfig`.
    #[must_use]
    pub fn builder() -> AtomicConfigBuilder {
        AtomicConfigBuilder::new()
    }

    /// Returns the API key.
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Returns the client identifier.
    #[must_use]
    pub const fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    /// Returns the API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the default request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the timeout used for raw downloads.
    #[must_use]
    pub const fn download_timeout(&self) -> Duration {
        self.download_timeout
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify AtomicConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AtomicConfig>();
};

/// Builder for constructing [`AtomicConfig`] instances.
///
/// Required fields are `api_key` and `client_id`.
///
/// # Defaults
///
/// - `base_url`: [`BaseUrl::DEFAULT`]
/// - `timeout`: 30 seconds
/// - `download_timeout`: 300 seconds
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct AtomicConfigBuilder {
    api_key: Option<ApiKey>,
    client_id: Option<ClientId>,
    base_url: Option<BaseUrl>,
    timeout: Option<Duration>,
    download_timeout: Option<Duration>,
    user_agent_prefix: Option<String>,
}

impl AtomicConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Sets the client identifier (required).
    #[must_use]
    pub fn client_id(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: BaseUrl) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Sets the default request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the timeout used for raw downloads.
    #[must_use]
    pub const fn download_timeout(mut self, timeout: Duration) -> Self {
        self.download_timeout = Some(timeout);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`AtomicConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `api_key` or
    /// `client_id` are not set, and [`ConfigError::ZeroTimeout`] if either
    /// timeout is zero.
    pub fn build(self) -> Result<AtomicConfig, ConfigError> {
        let api_key = self
            .api_key
            .ok_or(ConfigError::MissingRequiredField { field: "api_key" })?;
        let client_id = self
            .client_id
            .ok_or(ConfigError::MissingRequiredField { field: "client_id" })?;

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout { field: "timeout" });
        }
        let download_timeout = self.download_timeout.unwrap_or(DEFAULT_DOWNLOAD_TIMEOUT);
        if download_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout {
                field: "download_timeout",
            });
        }

        Ok(AtomicConfig {
            api_key,
            client_id,
            base_url: self.base_url.unwrap_or_default(),
            timeout,
            download_timeout,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
