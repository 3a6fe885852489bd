//! The base of every endpoint-specific client.
//!
//! [`ResourceClient`] is the only path from a resource method to the
//! network. Every call runs the same pipeline:
//!
//! ```text
//! HttpRequest -> HttpClient::execute -> classify -> normalize -> bind | Job
//! ```
//!
//! Resource clients build a descriptor with [`ResourceClient::get`] or
//! [`ResourceClient::post`], then hand it to one of the typed conveniences:
//!
//! - [`fetch`](ResourceClient::fetch): one typed record
//! - [`fetch_all`](ResourceClient::fetch_all): an ordered list of typed records
//! - [`submit`](ResourceClient::submit): a pollable [`Job`]
//! - [`download`](ResourceClient::download): raw bytes
//!
//! # Example
//!
//! ```rust,ignore
//! use atomic_api::rest::ResourceClient;
//! use serde_json::Value;
//!
//! let sites: Vec<Value> = client
//!     .fetch_all(client.get("/get-sites/agency").query_param("limit", 10))
//!     .await?;
//! ```

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::clients::{
    classify, normalize, ApiError, HttpClient, HttpMethod, HttpRequest, HttpRequestBuilder,
    JobPolling, NormalizedPayload, Outcome, ResponseKind,
};
use crate::rest::{bind, bind_all, Job, SiteRef};

/// The typed result of [`ResourceClient::call`].
#[derive(Debug)]
pub enum Payload<T> {
    /// A single record.
    Record(T),
    /// An ordered list of records.
    Records(Vec<T>),
    /// A job handle.
    Job(Job),
}

/// Shared base for endpoint-specific clients.
///
/// Cloning is cheap: every clone shares one [`HttpClient`] and therefore one
/// set of credentials.
#[derive(Clone, Debug)]
pub struct ResourceClient {
    http: Arc<HttpClient>,
}

// Verify ResourceClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceClient>();
};

impl ResourceClient {
    /// Creates a resource client over a shared transport.
    #[must_use]
    pub const fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Returns the shared transport.
    #[must_use]
    pub const fn http(&self) -> &Arc<HttpClient> {
        &self.http
    }

    /// Returns the client identifier used in resource paths.
    #[must_use]
    pub fn client_id(&self) -> &str {
        self.http.client_id().as_ref()
    }

    /// Returns the service segment for a site-scoped path.
    #[must_use]
    pub fn service<'a>(&'a self, site: &SiteRef) -> &'a str {
        site.service(self.client_id())
    }

    /// Starts a GET request descriptor.
    #[must_use]
    pub fn get(&self, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequest::builder(HttpMethod::Get, path)
    }

    /// Starts a POST request descriptor.
    #[must_use]
    pub fn post(&self, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequest::builder(HttpMethod::Post, path)
    }

    /// Executes a request and returns the normalized payload.
    ///
    /// # Errors
    ///
    /// Returns the transport, classification or normalization error.
    pub async fn send(&self, request: &HttpRequest) -> Result<NormalizedPayload, ApiError> {
        let response = self.http.execute(request).await?;
        match classify(&response) {
            Outcome::Proceed(body) => normalize(body, &request.expected),
            Outcome::Fail(error) => Err(error),
        }
    }

    /// Executes a request and binds the result to the declared kind.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error, including [`ApiError::SchemaValidation`]
    /// when a record does not match `T`.
    pub async fn call<T: DeserializeOwned>(
        &self,
        request: &HttpRequest,
    ) -> Result<Payload<T>, ApiError> {
        Ok(match self.send(request).await? {
            NormalizedPayload::Value(value) => Payload::Record(bind(value)?),
            NormalizedPayload::Collection(values) => Payload::Records(bind_all(values)?),
            NormalizedPayload::Job(descriptor) => {
                Payload::Job(Job::from_descriptor(self.clone(), descriptor))
            }
        })
    }

    /// Fetches a single typed record.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        request: HttpRequestBuilder,
    ) -> Result<T, ApiError> {
        let request = request.expect(ResponseKind::Value).build()?;
        match self.send(&request).await? {
            NormalizedPayload::Value(value) => bind(value),
            _ => Err(ApiError::schema::<T>("expected a single value")),
        }
    }

    /// Fetches an ordered list of typed records.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error, including [`ApiError::SchemaValidation`]
    /// when the payload is not a sequence.
    pub async fn fetch_all<T: DeserializeOwned>(
        &self,
        request: HttpRequestBuilder,
    ) -> Result<Vec<T>, ApiError> {
        let request = request.expect(ResponseKind::Collection).build()?;
        match self.send(&request).await? {
            NormalizedPayload::Collection(values) => bind_all(values),
            _ => Err(ApiError::schema::<Vec<T>>("expected a sequence")),
        }
    }

    /// Submits a request that starts a job polled on the default
    /// job-status route.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error, including [`ApiError::SchemaValidation`]
    /// when the response carries no job identifier.
    pub async fn submit(&self, request: HttpRequestBuilder) -> Result<Job, ApiError> {
        self.submit_with(request, JobPolling::Pollable(crate::clients::PollRoute::job_status()))
            .await
    }

    /// Submits a request that starts a job with explicit polling behaviour.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn submit_with(
        &self,
        request: HttpRequestBuilder,
        polling: JobPolling,
    ) -> Result<Job, ApiError> {
        let request = request.expect(ResponseKind::Job(polling)).build()?;
        match self.send(&request).await? {
            NormalizedPayload::Job(descriptor) => {
                Ok(Job::from_descriptor(self.clone(), descriptor))
            }
            _ => Err(ApiError::schema::<Job>("expected a job descriptor")),
        }
    }

    /// Downloads a raw body using the download timeout.
    ///
    /// Failures are classified like any other response; a successful body is
    /// returned unparsed.
    ///
    /// # Errors
    ///
    /// Returns the transport or classification error.
    pub async fn download(&self, request: HttpRequestBuilder) -> Result<Vec<u8>, ApiError> {
        let request = request.timeout(self.http.download_timeout()).build()?;
        let response = self.http.execute(&request).await?;
        match classify(&response) {
            Outcome::Proceed(_) => Ok(response.body),
            Outcome::Fail(error) => Err(error),
        }
    }
}
