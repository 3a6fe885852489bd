//! HTTP response types for the Atomic API SDK.
//!
//! This module provides the [`HttpResponse`] type: the raw outcome of one
//! network exchange, before classification or normalization.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;

/// A raw HTTP response from the Atomic API.
///
/// Holds the status code, headers, the raw body bytes and a best-effort JSON
/// view of the body. `json` is `None` when the body is empty or not JSON
/// (for example an HTML error page or a backup archive).
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, keyed by lowercase name (headers may repeat).
    pub headers: HashMap<String, Vec<String>>,
    /// The raw response body.
    pub body: Vec<u8>,
    /// The body parsed as JSON, when it parses.
    pub json: Option<Value>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, parsing the body as JSON when possible.
    ///
    /// # Example
    ///
    /// ```rust
    /// use atomic_api::HttpResponse;
    /// use std::collections::HashMap;
    ///
    /// let response = HttpResponse::new(200, HashMap::new(), br#"{"job_id":"abc"}"#.to_vec());
    /// assert!(response.is_ok());
    /// assert_eq!(response.json.unwrap()["job_id"], "abc");
    ///
    /// let html = HttpResponse::new(500, HashMap::new(), b"<html>oops</html>".to_vec());
    /// assert!(html.json.is_none());
    /// ```
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: Vec<u8>) -> Self {
        let json = if body.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            serde_json::from_slice(&body).ok()
        };

        Self {
            code,
            headers,
            body,
            json,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the first value of a header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `X-Request-Id` header value, if present.
    ///
    /// This ID is useful for debugging and should be included in error reports.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// Returns the delay requested by the `Retry-After` header, if present
    /// and expressed in seconds.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        self.header("retry-after")
            .and_then(|value| value.trim().parse::<f64>().ok())
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map(Duration::from_secs_f64)
    }

    /// Returns the body decoded as UTF-8 text, replacing invalid sequences.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
