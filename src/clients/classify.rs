//! Mapping of raw responses to success or a typed failure.
//!
//! [`classify`] is a pure function of the response: it never fails, even on
//! an empty or non-JSON error body, and a 2xx response always proceeds.
//!
//! | Status | Outcome |
//! |---|---|
//! | 2xx | [`Outcome::Proceed`] |
//! | 404 | [`ErrorKind::NotFound`] |
//! | 400, 422 | [`ErrorKind::InvalidRequest`] |
//! | 401, 403 | [`ErrorKind::AuthenticationOrAuthorization`] |
//! | 429 | [`ErrorKind::RateLimited`] |
//! | 5xx | [`ErrorKind::ServerError`] |
//! | other | body signal, else [`ErrorKind::GenericApiError`] |

use serde_json::Value;

use crate::clients::errors::{ApiError, ErrorKind, HttpResponseError};
use crate::clients::http_response::HttpResponse;

/// Body fields that may carry a human readable error message, in priority order.
const MESSAGE_FIELDS: &[&str] = &["message", "error", "error_description", "errors"];

/// Body fields that may carry a machine readable error code.
const CODE_FIELDS: &[&str] = &["code", "error"];

/// The result of classifying a response.
#[derive(Debug)]
pub enum Outcome {
    /// The response is a success; its JSON view (or `null`) is passed on.
    Proceed(Value),
    /// The response is a failure.
    Fail(ApiError),
}

/// Classifies a raw response.
///
/// # Example
///
/// ```rust
/// use atomic_api::clients::{classify, Outcome};
/// use atomic_api::{ErrorKind, HttpResponse};
/// use std::collections::HashMap;
///
/// let response = HttpResponse::new(401, HashMap::new(), br#"{"error":"invalid api key"}"#.to_vec());
/// match classify(&response) {
///     Outcome::Fail(error) => {
///         assert_eq!(error.kind(), ErrorKind::AuthenticationOrAuthorization);
///         assert_eq!(error.response().unwrap().message, "invalid api key");
///     }
///     Outcome::Proceed(_) => unreachable!(),
/// }
/// ```
#[must_use]
pub fn classify(response: &HttpResponse) -> Outcome {
    if response.is_ok() {
        return Outcome::Proceed(response.json.clone().unwrap_or(Value::Null));
    }

    let error = HttpResponseError {
        code: response.code,
        message: extract_message(response),
        body: response.text(),
        request_id: response.request_id().map(String::from),
    };

    let kind = match response.code {
        404 => ErrorKind::NotFound,
        400 | 422 => ErrorKind::InvalidRequest,
        401 | 403 => ErrorKind::AuthenticationOrAuthorization,
        429 => ErrorKind::RateLimited,
        500..=599 => ErrorKind::ServerError,
        _ => body_signal(response.json.as_ref()).unwrap_or(ErrorKind::GenericApiError),
    };

    tracing::warn!(
        status = error.code,
        kind = %kind,
        request_id = error.request_id.as_deref().unwrap_or("-"),
        "Atomic API request failed: {}",
        error.message
    );

    let error = match kind {
        ErrorKind::NotFound => ApiError::NotFound(error),
        ErrorKind::InvalidRequest => ApiError::InvalidRequest(error),
        ErrorKind::AuthenticationOrAuthorization => ApiError::Authentication(error),
        ErrorKind::RateLimited => ApiError::RateLimited {
            error,
            retry_after: response.retry_after(),
        },
        ErrorKind::ServerError => ApiError::Server(error),
        _ => ApiError::Api(error),
    };
    Outcome::Fail(error)
}

/// Extracts the best available message from an error body.
fn extract_message(response: &HttpResponse) -> String {
    response
        .json
        .as_ref()
        .and_then(|body| {
            MESSAGE_FIELDS
                .iter()
                .find_map(|field| body.get(*field).and_then(message_text))
        })
        .unwrap_or_else(|| fallback_message(response.code))
}

fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(message_text),
        Value::Object(map) => map.get("message").and_then(message_text),
        _ => None,
    }
}

fn fallback_message(code: u16) -> String {
    let reason = reqwest::StatusCode::from_u16(code)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or("Unknown Status");
    format!("HTTP {code} {reason}")
}

/// Looks for an explicit not-found or invalid-input code in the body.
fn body_signal(body: Option<&Value>) -> Option<ErrorKind> {
    let body = body?;
    CODE_FIELDS.iter().find_map(|field| {
        let code = body.get(*field)?.as_str()?.to_ascii_lowercase();
        if code == "not_found" || code.ends_with("_not_found") {
            Some(ErrorKind::NotFound)
        } else if code.starts_with("invalid") || code == "bad_request" {
            Some(ErrorKind::InvalidRequest)
        } else {
            None
        }
    })
}
