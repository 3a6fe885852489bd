//! HTTP client types for Atomic API communication.
//!
//! This module is the lower half of the request pipeline:
//!
//! ```text
//! HttpRequest -> HttpClient::execute -> HttpResponse -> classify -> normalize
//! ```
//!
//! # Overview
//!
//! - [`HttpClient`]: Performs one authenticated exchange per call
//! - [`HttpRequest`]: An immutable request descriptor built with [`HttpRequestBuilder`]
//! - [`HttpResponse`]: The raw status, headers and body of a response
//! - [`classify`]: Maps a response to success or a typed [`ApiError`]
//! - [`normalize`]: Reconciles success bodies into a [`NormalizedPayload`]
//!
//! # Example
//!
//! ```rust,ignore
//! use atomic_api::clients::{classify, normalize, HttpClient, HttpMethod, HttpRequest, Outcome, ResponseKind};
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "/get-sites/agency")
//!     .expect(ResponseKind::Collection)
//!     .build()?;
//! let response = client.execute(&request).await?;
//! let body = match classify(&response) {
//!     Outcome::Proceed(body) => body,
//!     Outcome::Fail(error) => return Err(error),
//! };
//! let payload = normalize(body, &request.expected)?;
//! ```
//!
//! # Retry Behavior
//!
//! There is none. Each call performs exactly one network exchange; a 429
//! surfaces as [`ApiError::RateLimited`] with the server's `Retry-After`
//! delay so the caller can decide.

mod classify;
mod errors;
mod http_client;
mod http_request;
mod http_response;
mod normalize;

pub use classify::{classify, Outcome};
pub use errors::{ApiError, ErrorKind, HttpResponseError, InvalidHttpRequestError};
pub(crate) use errors::short_type_name;
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{
    encode_form, FormPart, HttpMethod, HttpRequest, HttpRequestBuilder, JobPolling, PollRoute,
    RequestBody, ResponseKind,
};
pub use http_response::HttpResponse;
pub use normalize::{normalize, JobDescriptor, JobId, NormalizedPayload};
