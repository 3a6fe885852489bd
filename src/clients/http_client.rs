//! HTTP transport for Atomic API communication.
//!
//! This module provides the [`HttpClient`] type, which performs exactly one
//! authenticated network exchange per call and never interprets status codes.

use std::collections::HashMap;

use reqwest::multipart::{Form, Part};

use crate::clients::errors::ApiError;
use crate::clients::http_request::{FormPart, HttpMethod, HttpRequest, RequestBody};
use crate::clients::http_response::HttpResponse;
use crate::config::{AtomicConfig, BaseUrl, ClientId};
use crate::error::ConfigError;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP transport for the Atomic API.
///
/// The client handles:
/// - URL construction from the configured base URL
/// - Default headers: `Auth`, `User-Agent` and `Accept`
/// - Request timeouts, with per-request overrides
/// - Body encoding (JSON, urlencoded form, multipart)
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`; resource clients share one instance through
/// an `Arc`.
///
/// # Example
///
/// ```rust,ignore
/// use atomic_api::{AtomicConfig, ApiKey, ClientId};
/// use atomic_api::clients::{HttpClient, HttpRequest, HttpMethod};
///
/// let config = AtomicConfig::builder()
///     .api_key(ApiKey::new("key").unwrap())
///     .client_id(ClientId::new("agency").unwrap())
///     .build()
///     .unwrap();
/// let client = HttpClient::new(&config)?;
///
/// let request = HttpRequest::builder(HttpMethod::Get, "/test-status").build()?;
/// let response = client.execute(&request).await?;
/// println!("{}", response.code);
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Base URL every request path is appended to.
    base_url: BaseUrl,
    /// Client identifier embedded in resource paths.
    client_id: ClientId,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
    /// Default request timeout.
    timeout: std::time::Duration,
    /// Timeout used for raw downloads.
    download_timeout: std::time::Duration,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new transport from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClientInit`] if the underlying reqwest
    /// client cannot be created (for example TLS initialisation failure).
    pub fn new(config: &AtomicConfig) -> Result<Self, ConfigError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}Rust AtomicSDK/{SDK_VERSION}");

        let mut default_headers = HashMap::new();
        default_headers.insert("Auth".to_string(), config.api_key().as_ref().to_string());
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ConfigError::HttpClientInit {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url().clone(),
            client_id: config.client_id().clone(),
            default_headers,
            timeout: config.timeout(),
            download_timeout: config.download_timeout(),
        })
    }

    /// Returns the base URL for this client.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the client identifier used in resource paths.
    #[must_use]
    pub const fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns the default request timeout.
    #[must_use]
    pub const fn timeout(&self) -> std::time::Duration {
        self.timeout
    }

    /// Returns the timeout used for raw downloads.
    #[must_use]
    pub const fn download_timeout(&self) -> std::time::Duration {
        self.download_timeout
    }

    /// Sends a request and returns the raw response, whatever its status.
    ///
    /// One call is exactly one network exchange: nothing is retried.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidHttpRequest`] if the request fails
    /// validation, and [`ApiError::Transport`] if no response was received
    /// (connection failure or timeout).
    pub async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        request.verify()?;

        let url = self.base_url.join(&request.path);
        tracing::debug!(
            method = %request.http_method,
            path = %request.path,
            "Sending Atomic API request"
        );

        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }

        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query);
        }

        if let Some(timeout) = request.timeout {
            req_builder = req_builder.timeout(timeout);
        }

        req_builder = match &request.body {
            None => req_builder,
            Some(RequestBody::Json(value)) => req_builder.json(value),
            Some(RequestBody::Form(fields)) => req_builder.form(fields),
            Some(RequestBody::Multipart(parts)) => req_builder.multipart(Self::multipart(parts)?),
        };

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let body = res.bytes().await?.to_vec();

        tracing::debug!(status = code, path = %request.path, "Received Atomic API response");

        Ok(HttpResponse::new(code, headers, body))
    }

    /// Builds a reqwest multipart form from request parts.
    fn multipart(parts: &[FormPart]) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for part in parts {
            form = match part {
                FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
                FormPart::File {
                    name,
                    file_name,
                    mime,
                    bytes,
                } => {
                    let file = Part::bytes(bytes.clone())
                        .file_name(file_name.clone())
                        .mime_str(mime)?;
                    form.part(name.clone(), file)
                }
            };
        }
        Ok(form)
    }

    /// Parses response headers into a `HashMap` keyed by lowercase name.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}
