//! Reconciliation of the API's non-uniform success shapes.
//!
//! A successful Atomic API response can be a bare value, a value wrapped in a
//! `data` envelope, a list, or a job descriptor. [`normalize`] turns any of
//! these into a [`NormalizedPayload`], using the [`ResponseKind`] declared by
//! the call site to disambiguate. Nothing is inferred beyond that
//! declaration: a job-shaped field inside a value payload stays a value.

use serde_json::{Map, Value};

use crate::clients::errors::ApiError;
use crate::clients::http_request::{JobPolling, ResponseKind};

/// Envelope metadata keys that may sit next to `data`.
const ENVELOPE_KEYS: &[&str] = &["message", "status", "code", "success"];

/// Fields that carry a job or request identifier, in priority order.
const JOB_ID_KEYS: &[&str] = &[
    "job_id",
    "atomic_backup_request_id",
    "request_id",
    "response_ticket_id",
    "ticket_id",
];

/// A job identifier as returned by the API (string or integer), held as a string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    /// Creates a job identifier from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Reads an identifier from a JSON string or integer.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(Self(s.trim().to_string())),
            Value::Number(n) if n.is_u64() || n.is_i64() => Some(Self(n.to_string())),
            _ => None,
        }
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for JobId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for JobId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// A job as described by the response that created it.
#[derive(Clone, Debug, PartialEq)]
pub struct JobDescriptor {
    /// The server-assigned identifier.
    pub id: JobId,
    /// Every field the creating response carried alongside the identifier.
    pub fields: Map<String, Value>,
    /// Whether and where the job can be polled.
    pub polling: JobPolling,
}

/// The normalized form of a successful response.
#[derive(Clone, Debug, PartialEq)]
pub enum NormalizedPayload {
    /// A single value.
    Value(Value),
    /// An ordered sequence of values.
    Collection(Vec<Value>),
    /// A job descriptor.
    Job(JobDescriptor),
}

/// Normalizes a successful response body according to the expected kind.
///
/// # Errors
///
/// Returns [`ApiError::SchemaValidation`] if a job was expected but no
/// identifier is present, or a collection was expected but the payload is
/// not a sequence.
///
/// # Example
///
/// ```rust
/// use atomic_api::clients::{normalize, NormalizedPayload, ResponseKind};
/// use serde_json::json;
///
/// let payload = normalize(json!({"job_id": "abc123"}), &ResponseKind::job()).unwrap();
/// match payload {
///     NormalizedPayload::Job(job) => assert_eq!(job.id.as_str(), "abc123"),
///     _ => unreachable!(),
/// }
///
/// let payload = normalize(json!({"data": {"id": 1}, "message": "OK"}), &ResponseKind::Value).unwrap();
/// assert_eq!(payload, NormalizedPayload::Value(json!({"id": 1})));
/// ```
pub fn normalize(body: Value, expected: &ResponseKind) -> Result<NormalizedPayload, ApiError> {
    match expected {
        ResponseKind::Job(polling) => job_descriptor(body, polling).map(NormalizedPayload::Job),
        ResponseKind::Collection => match unwrap_envelope(body) {
            Value::Array(items) => Ok(NormalizedPayload::Collection(items)),
            Value::Null => Ok(NormalizedPayload::Collection(Vec::new())),
            other => Err(ApiError::SchemaValidation {
                type_name: "collection".to_string(),
                message: format!("expected a sequence, got {}", shape_of(&other)),
            }),
        },
        ResponseKind::Value => Ok(NormalizedPayload::Value(unwrap_envelope(body))),
    }
}

/// Returns `true` if the body is a `data` envelope: an object holding `data`
/// and nothing but envelope metadata.
fn is_envelope(body: &Value) -> bool {
    body.as_object().is_some_and(|map| {
        map.contains_key("data")
            && map
                .keys()
                .all(|key| key == "data" || ENVELOPE_KEYS.contains(&key.as_str()))
    })
}

/// Unwraps a `data` envelope, returning any other body unchanged.
fn unwrap_envelope(body: Value) -> Value {
    if is_envelope(&body) {
        if let Value::Object(mut map) = body {
            return map.remove("data").unwrap_or(Value::Null);
        }
    }
    body
}

fn job_descriptor(body: Value, polling: &JobPolling) -> Result<JobDescriptor, ApiError> {
    // An identifier at the top level wins over one inside the envelope.
    let body = if find_job_id(&body).is_some() {
        body
    } else {
        unwrap_envelope(body)
    };

    let id = find_job_id(&body).ok_or_else(|| ApiError::SchemaValidation {
        type_name: "job".to_string(),
        message: format!(
            "expected a job identifier ({}), got {}",
            JOB_ID_KEYS.join(", "),
            shape_of(&body)
        ),
    })?;

    let fields = match body {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    Ok(JobDescriptor {
        id,
        fields,
        polling: polling.clone(),
    })
}

fn find_job_id(body: &Value) -> Option<JobId> {
    match body {
        Value::Object(map) => JOB_ID_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(JobId::from_value)),
        Value::String(_) | Value::Number(_) => JobId::from_value(body),
        _ => None,
    }
}

fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::ErrorKind;
    use serde_json::json;

    fn job(body: Value) -> JobDescriptor {
        match normalize(body, &ResponseKind::job()).unwrap() {
            NormalizedPayload::Job(job) => job,
            other => panic!("expected job, got {other:?}"),
        }
    }

    #[test]
    fn test_job_id_string_at_top_level() {
        let descriptor = job(json!({"job_id": "abc123"}));
        assert_eq!(descriptor.id.as_str(), "abc123");
    }

    #[test]
    fn test_job_id_inside_envelope_keeps_fields() {
        let descriptor = job(json!({
            "message": "OK",
            "data": {"job_id": 981, "atomic_site_id": 7, "domain_name": "example.com"}
        }));
        assert_eq!(descriptor.id.as_str(), "981");
        assert_eq!(descriptor.fields["domain_name"], "example.com");
    }

    #[test]
    fn test_backup_request_id_is_a_job_id() {
        let body = json!({"data": {"atomic_backup_request_id": 55}});
        match normalize(body, &ResponseKind::fire_and_forget()).unwrap() {
            NormalizedPayload::Job(job) => {
                assert_eq!(job.id.as_str(), "55");
                assert_eq!(job.polling, JobPolling::FireAndForget);
            }
            other => panic!("expected job, got {other:?}"),
        }
    }

    #[test]
    fn test_bare_scalar_job_id() {
        assert_eq!(job(json!({"data": 1234})).id.as_str(), "1234");
    }

    #[test]
    fn test_job_expected_without_id_is_schema_error() {
        let error = normalize(json!({"data": {"site": 1}}), &ResponseKind::job()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::SchemaValidation);
    }

    #[test]
    fn test_collection_preserves_order() {
        let payload = normalize(json!([{"id": 1}, {"id": 2}]), &ResponseKind::Collection).unwrap();
        assert_eq!(
            payload,
            NormalizedPayload::Collection(vec![json!({"id": 1}), json!({"id": 2})])
        );
    }

    #[test]
    fn test_collection_inside_envelope() {
        let payload =
            normalize(json!({"data": ["a", "b", "c"]}), &ResponseKind::Collection).unwrap();
        assert_eq!(
            payload,
            NormalizedPayload::Collection(vec![json!("a"), json!("b"), json!("c")])
        );
    }

    #[test]
    fn test_null_collection_is_empty() {
        let payload = normalize(json!({"data": null}), &ResponseKind::Collection).unwrap();
        assert_eq!(payload, NormalizedPayload::Collection(Vec::new()));
        let payload = normalize(Value::Null, &ResponseKind::Collection).unwrap();
        assert_eq!(payload, NormalizedPayload::Collection(Vec::new()));
    }

    #[test]
    fn test_collection_expected_but_object_received() {
        let error = normalize(json!({"data": {"id": 1}}), &ResponseKind::Collection).unwrap_err();
        assert!(matches!(
            error,
            ApiError::SchemaValidation { ref type_name, .. } if type_name == "collection"
        ));
    }

    #[test]
    fn test_value_is_unwrapped_from_envelope() {
        let payload = normalize(
            json!({"data": {"allowed": true}, "status": 200, "success": true}),
            &ResponseKind::Value,
        )
        .unwrap();
        assert_eq!(payload, NormalizedPayload::Value(json!({"allowed": true})));
    }

    #[test]
    fn test_object_with_data_and_other_keys_is_not_an_envelope() {
        let body = json!({"data": 1, "atomic_site_id": 2});
        let payload = normalize(body.clone(), &ResponseKind::Value).unwrap();
        assert_eq!(payload, NormalizedPayload::Value(body));
    }

    #[test]
    fn test_job_shaped_value_is_not_promoted() {
        let body = json!({"data": {"job_id": 5, "status": "queued"}});
        let payload = normalize(body, &ResponseKind::Value).unwrap();
        assert_eq!(
            payload,
            NormalizedPayload::Value(json!({"job_id": 5, "status": "queued"}))
        );
    }

    #[test]
    fn test_bare_value_passes_through() {
        let payload = normalize(json!("success"), &ResponseKind::Value).unwrap();
        assert_eq!(payload, NormalizedPayload::Value(json!("success")));
    }
}
