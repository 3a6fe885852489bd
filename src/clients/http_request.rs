//! HTTP request types for the Atomic API SDK.
//!
//! This module provides the [`HttpRequest`] descriptor and its builder. A
//! descriptor is immutable once built and carries everything the transport
//! and the response normalizer need: method, path, query, body, and the
//! response kind the call site expects.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde_json::Value;

use crate::clients::errors::InvalidHttpRequestError;

/// HTTP methods used by the Atomic API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating and mutating resources.
    Post,
    /// HTTP PUT method.
    Put,
    /// HTTP DELETE method.
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// A single part of a multipart body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormPart {
    /// A plain text field.
    Text {
        /// Field name.
        name: String,
        /// Field value.
        value: String,
    },
    /// A file-like field.
    File {
        /// Field name.
        name: String,
        /// File name reported to the server.
        file_name: String,
        /// MIME type of the content.
        mime: String,
        /// Raw content.
        bytes: Vec<u8>,
    },
}

impl FormPart {
    /// Creates a text part.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Creates a file part.
    #[must_use]
    pub fn file(
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self::File {
            name: name.into(),
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Returns the field name of this part.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Text { name, .. } | Self::File { name, .. } => name,
        }
    }
}

/// The body of a request.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    /// A JSON document (`application/json`).
    Json(Value),
    /// URL-encoded form fields in order (`application/x-www-form-urlencoded`).
    Form(Vec<(String, String)>),
    /// Multipart form parts (`multipart/form-data`).
    Multipart(Vec<FormPart>),
}

/// Where a job handle polls for status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PollRoute {
    /// HTTP method used to poll.
    pub method: HttpMethod,
    /// Path template with a `{job_id}` placeholder.
    pub template: String,
}

impl PollRoute {
    /// The default job-status route.
    #[must_use]
    pub fn job_status() -> Self {
        Self::get("/job-status/{job_id}")
    }

    /// The response-ticket summary route used by migrations.
    #[must_use]
    pub fn response_ticket() -> Self {
        Self::get("/response-ticket/get/summary/{job_id}")
    }

    /// Creates a GET poll route from a template.
    #[must_use]
    pub fn get(template: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            template: template.into(),
        }
    }

    /// Substitutes the job identifier into the template.
    #[must_use]
    pub fn path_for(&self, job_id: &str) -> String {
        self.template
            .replace("{job_id}", &urlencoding::encode(job_id))
    }
}

/// Whether a job can be polled after it is created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JobPolling {
    /// The job exposes status on the given route.
    Pollable(PollRoute),
    /// The server never exposes status for this job.
    FireAndForget,
}

/// The response shape a call site expects.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum ResponseKind {
    /// A single value.
    #[default]
    Value,
    /// An ordered sequence of values.
    Collection,
    /// A job descriptor.
    Job(JobPolling),
}

impl ResponseKind {
    /// A pollable job on the default job-status route.
    #[must_use]
    pub fn job() -> Self {
        Self::Job(JobPolling::Pollable(PollRoute::job_status()))
    }

    /// A job the server never exposes status for.
    #[must_use]
    pub const fn fire_and_forget() -> Self {
        Self::Job(JobPolling::FireAndForget)
    }
}

/// A request descriptor for the Atomic API.
///
/// Use [`HttpRequest::builder`] to construct requests.
///
/// # Example
///
/// ```rust
/// use atomic_api::clients::{HttpRequest, HttpMethod, ResponseKind};
///
/// let request = HttpRequest::builder(HttpMethod::Post, "/create-site")
///     .form_field("domain_name", "example.com")
///     .form_field("admin_user", "admin")
///     .expect(ResponseKind::job())
///     .build()
///     .unwrap();
///
/// assert_eq!(request.path, "/create-site");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The path relative to the API base URL.
    pub path: String,
    /// Query parameters; keys are unique.
    pub query: BTreeMap<String, String>,
    /// The request body, if any.
    pub body: Option<RequestBody>,
    /// The response kind the caller expects.
    pub expected: ResponseKind,
    /// Per-request timeout overriding the client default.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the path is empty, a GET
    /// request carries a body, or a form field name is empty.
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if self.path.trim().is_empty() {
            return Err(InvalidHttpRequestError::EmptyPath);
        }

        if self.http_method == HttpMethod::Get && self.body.is_some() {
            return Err(InvalidHttpRequestError::BodyNotAllowed {
                method: self.http_method.to_string(),
            });
        }

        let empty_name = match &self.body {
            Some(RequestBody::Form(fields)) => fields.iter().any(|(k, _)| k.is_empty()),
            Some(RequestBody::Multipart(parts)) => parts.iter().any(|p| p.name().is_empty()),
            _ => false,
        };
        if empty_name {
            return Err(InvalidHttpRequestError::EmptyFieldName);
        }

        Ok(())
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    path: String,
    query: BTreeMap<String, String>,
    body: Option<RequestBody>,
    expected: ResponseKind,
    timeout: Option<Duration>,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            http_method: method,
            path: path.into(),
            query: BTreeMap::new(),
            body: None,
            expected: ResponseKind::Value,
            timeout: None,
        }
    }

    /// Adds a single query parameter, replacing any previous value for the key.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.insert(key.into(), value.to_string());
        self
    }

    /// Adds a query parameter only when the value is present.
    #[must_use]
    pub fn query_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query_param(key, value),
            None => self,
        }
    }

    /// Sets a JSON body.
    #[must_use]
    pub fn json(mut self, body: impl Into<Value>) -> Self {
        self.body = Some(RequestBody::Json(body.into()));
        self
    }

    /// Appends a single urlencoded form field.
    ///
    /// Replaces a JSON or multipart body if one was set.
    #[must_use]
    pub fn form_field(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        let pair = (key.into(), value.to_string());
        match &mut self.body {
            Some(RequestBody::Form(fields)) => fields.push(pair),
            _ => self.body = Some(RequestBody::Form(vec![pair])),
        }
        self
    }

    /// Appends a form field only when the value is present.
    #[must_use]
    pub fn form_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.form_field(key, value),
            None => self,
        }
    }

    /// Appends every field of a JSON object as urlencoded form fields,
    /// flattening nested objects and arrays with bracketed keys.
    ///
    /// `{"meta": {"a": 1}, "ids": [1, 2]}` becomes `meta[a]=1`, `ids[]=1`,
    /// `ids[]=2`.
    #[must_use]
    pub fn form_value(mut self, value: &Value) -> Self {
        for (key, value) in encode_form(value) {
            self = self.form_field(key, value);
        }
        self
    }

    /// Appends a multipart part.
    ///
    /// Replaces a JSON or urlencoded body if one was set.
    #[must_use]
    pub fn part(mut self, part: FormPart) -> Self {
        match &mut self.body {
            Some(RequestBody::Multipart(parts)) => parts.push(part),
            _ => self.body = Some(RequestBody::Multipart(vec![part])),
        }
        self
    }

    /// Declares the response kind the call site expects.
    #[must_use]
    pub fn expect(mut self, kind: ResponseKind) -> Self {
        self.expected = kind;
        self
    }

    /// Overrides the client timeout for this request.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the request fails validation.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        let request = HttpRequest {
            http_method: self.http_method,
            path: self.path,
            query: self.query,
            body: self.body,
            expected: self.expected,
            timeout: self.timeout,
        };
        request.verify()?;
        Ok(request)
    }
}

/// Flattens a JSON value into urlencoded form pairs using bracketed keys.
///
/// Objects contribute `parent[key]`, arrays of scalars contribute
/// `parent[]`, and arrays of objects contribute `parent[index][key]`.
/// `null` values are skipped and booleans are sent as `1`/`0`.
#[must_use]
pub fn encode_form(value: &Value) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    if let Value::Object(map) = value {
        for (key, value) in map {
            flatten_into(&mut pairs, key.clone(), value);
        }
    }
    pairs
}

fn flatten_into(pairs: &mut Vec<(String, String)>, key: String, value: &Value) {
    match value {
        Value::Null => {}
        Value::Bool(b) => pairs.push((key, if *b { "1" } else { "0" }.to_string())),
        Value::Number(n) => pairs.push((key, n.to_string())),
        Value::String(s) => pairs.push((key, s.clone())),
        Value::Array(items) => {
            let nested = items.iter().any(|v| v.is_object() || v.is_array());
            for (index, item) in items.iter().enumerate() {
                let child = if nested {
                    format!("{key}[{index}]")
                } else {
                    format!("{key}[]")
                };
                flatten_into(pairs, child, item);
            }
        }
        Value::Object(map) => {
            for (child, value) in map {
                flatten_into(pairs, format!("{key}[{child}]"), value);
            }
        }
    }
}

// Verify request types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpRequest>();
    assert_send_sync::<ResponseKind>();
};
