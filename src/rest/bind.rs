//! Binding of normalized payloads to typed records.
//!
//! [`bind`] turns a [`serde_json::Value`] into any `DeserializeOwned` record
//! and reports the first schema violation as
//! [`ApiError::SchemaValidation`](crate::ApiError::SchemaValidation), naming
//! the record type. Records keep unknown fields by declaring a
//! `#[serde(flatten)] extra: serde_json::Map<String, Value>` field.
//!
//! The [`de`] helpers cope with the API's habits: `""` for unset optional
//! values, and timestamps sent as unix seconds or formatted strings.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::clients::{short_type_name, ApiError};

/// Binds a value payload to a typed record.
///
/// # Errors
///
/// Returns [`ApiError::SchemaValidation`] naming the record type and the
/// first violation when a required field is missing or has an incompatible
/// type.
///
/// # Example
///
/// ```rust
/// use atomic_api::rest::bind;
/// use serde::Deserialize;
/// use serde_json::{json, Map, Value};
///
/// #[derive(Debug, Deserialize)]
/// struct Alias {
///     domain: String,
///     #[serde(flatten)]
///     extra: Map<String, Value>,
/// }
///
/// let alias: Alias = bind(json!({"domain": "www.example.com", "primary": false})).unwrap();
/// assert_eq!(alias.domain, "www.example.com");
/// assert_eq!(alias.extra["primary"], false);
///
/// let error = bind::<Alias>(json!({"primary": true})).unwrap_err();
/// assert!(error.to_string().contains("Alias"));
/// assert!(error.to_string().contains("domain"));
/// ```
pub fn bind<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::SchemaValidation {
        type_name: short_type_name::<T>(),
        message: e.to_string(),
    })
}

/// Binds every element of a collection, preserving order.
///
/// # Errors
///
/// Returns the error of the first element that fails to bind, with its
/// position in the message.
pub fn bind_all<T: DeserializeOwned>(values: Vec<Value>) -> Result<Vec<T>, ApiError> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            bind(value).map_err(|e| match e {
                ApiError::SchemaValidation { type_name, message } => ApiError::SchemaValidation {
                    type_name,
                    message: format!("item {index}: {message}"),
                },
                other => other,
            })
        })
        .collect()
}

/// Serde helpers for fields the API encodes loosely.
pub mod de {
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
    use serde::de::{self, DeserializeOwned};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use std::str::FromStr;

    /// Deserializes an optional field, treating `""` and `null` as absent.
    ///
    /// # Errors
    ///
    /// Returns a deserialization error if a non-empty value does not match `T`.
    pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            Value::String(s) if s.is_empty() => Ok(None),
            other => serde_json::from_value(other).map(Some).map_err(de::Error::custom),
        }
    }

    /// Deserializes a string field that the API sometimes sends as a number.
    ///
    /// # Errors
    ///
    /// Returns a deserialization error for any other JSON type.
    pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(de::Error::custom(format!(
                "expected a string or number, got {other}"
            ))),
        }
    }

    /// Deserializes an optional integer that may arrive as a number or a
    /// numeric string. `""` and `null` are absent.
    ///
    /// # Errors
    ///
    /// Returns a deserialization error if the value is not an integer of type `T`.
    pub fn optional_int<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + FromStr,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            Value::String(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return Ok(None);
                }
                s.parse::<T>()
                    .map(Some)
                    .map_err(|_| de::Error::custom(format!("invalid integer: {s:?}")))
            }
            other => serde_json::from_value(other).map(Some).map_err(de::Error::custom),
        }
    }

    /// Deserializes an optional flag sent as a boolean, `0`/`1`, or
    /// `"0"`/`"1"`. `""` and `null` are absent.
    ///
    /// # Errors
    ///
    /// Returns a deserialization error for any other value.
    pub fn optional_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match &value {
            Value::Null => Ok(None),
            Value::Bool(b) => Ok(Some(*b)),
            Value::Number(n) => match n.as_u64() {
                Some(0) => Ok(Some(false)),
                Some(1) => Ok(Some(true)),
                _ => Err(de::Error::custom(format!("invalid flag: {value}"))),
            },
            Value::String(s) => match s.trim() {
                "" => Ok(None),
                "0" | "false" => Ok(Some(false)),
                "1" | "true" => Ok(Some(true)),
                _ => Err(de::Error::custom(format!("invalid flag: {value}"))),
            },
            _ => Err(de::Error::custom(format!("invalid flag: {value}"))),
        }
    }

    /// Deserializes a timestamp sent as unix seconds, RFC 3339, or
    /// `YYYY-MM-DD HH:MM:SS` (UTC).
    ///
    /// # Errors
    ///
    /// Returns a deserialization error if the value cannot be read as a time.
    pub fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        parse_timestamp(&value)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {value}")))
    }

    /// Like [`timestamp`], but `""` and `null` are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns a deserialization error if a present value cannot be read as a time.
    pub fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            Value::String(s) if s.is_empty() => Ok(None),
            other => parse_timestamp(&other)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {other}"))),
        }
    }

    fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
        match value {
            Value::Number(n) => n.as_i64().and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
            Value::String(s) => {
                let s = s.trim();
                if let Ok(secs) = s.parse::<i64>() {
                    return Utc.timestamp_opt(secs, 0).single();
                }
                if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                    return Some(dt.with_timezone(&Utc));
                }
                NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                    .ok()
                    .map(|naive| Utc.from_utc_datetime(&naive))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::ErrorKind;
    use chrono::{DateTime, Datelike, Utc};
    use serde::Deserialize;
    use serde_json::{json, Map};

    #[derive(Debug, Deserialize)]
    struct Record {
        id: u64,
        name: String,
        #[serde(default, deserialize_with = "de::empty_string_as_none")]
        version: Option<String>,
        #[serde(default, deserialize_with = "de::optional_timestamp")]
        completed: Option<DateTime<Utc>>,
        #[serde(flatten)]
        extra: Map<String, Value>,
    }

    #[test]
    fn test_bind_missing_required_field() {
        let error = bind::<Record>(json!({"name": "x"})).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::SchemaValidation);
        match error {
            ApiError::SchemaValidation { type_name, message } => {
                assert_eq!(type_name, "Record");
                assert!(message.contains("id"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_bind_incompatible_type() {
        let error = bind::<Record>(json!({"id": "not a number", "name": "x"})).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::SchemaValidation);
    }

    #[test]
    fn test_bind_keeps_extra_fields_unmodified() {
        let record: Record = bind(json!({
            "id": 1,
            "name": "site",
            "server_pool_id": 9,
            "nested": {"a": [1, 2]}
        }))
        .unwrap();
        assert_eq!(record.id, 1);
        assert_eq!(record.extra["server_pool_id"], json!(9));
        assert_eq!(record.extra["nested"], json!({"a": [1, 2]}));
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let record: Record =
            bind(json!({"id": 1, "name": "x", "version": "", "completed": ""})).unwrap();
        assert!(record.version.is_none());
        assert!(record.completed.is_none());
    }

    #[test]
    fn test_timestamp_formats() {
        for raw in [
            json!(1_700_000_000),
            json!("1700000000"),
            json!("2023-11-14T22:13:20Z"),
            json!("2023-11-14 22:13:20"),
        ] {
            let record: Record = bind(json!({"id": 1, "name": "x", "completed": raw})).unwrap();
            let completed = record.completed.unwrap();
            assert_eq!(completed.timestamp(), 1_700_000_000);
            assert_eq!(completed.year(), 2023);
        }
    }

    #[test]
    fn test_bind_all_preserves_order_and_reports_index() {
        let records: Vec<Record> = bind_all(vec![
            json!({"id": 1, "name": "a"}),
            json!({"id": 2, "name": "b"}),
        ])
        .unwrap();
        assert_eq!(records.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);

        let error = bind_all::<Record>(vec![json!({"id": 1, "name": "a"}), json!({})]).unwrap_err();
        assert!(error.to_string().contains("item 1"));
    }

    #[derive(Debug, Deserialize)]
    struct Loose {
        #[serde(default, deserialize_with = "de::optional_int")]
        count: Option<i64>,
        #[serde(default, deserialize_with = "de::optional_flag")]
        enabled: Option<bool>,
    }

    #[test]
    fn test_optional_int_reads_numbers_and_numeric_strings() {
        for (raw, expected) in [
            (json!(3), Some(3)),
            (json!("3"), Some(3)),
            (json!(" -7 "), Some(-7)),
            (json!(""), None),
            (Value::Null, None),
        ] {
            let loose: Loose = bind(json!({"count": raw})).unwrap();
            assert_eq!(loose.count, expected);
        }
        assert!(bind::<Loose>(json!({"count": "three"})).is_err());
        assert!(bind::<Loose>(json!({"count": 1.5})).is_err());
    }

    #[test]
    fn test_optional_flag_reads_bools_and_zero_one() {
        for (raw, expected) in [
            (json!(true), Some(true)),
            (json!(0), Some(false)),
            (json!(1), Some(true)),
            (json!("0"), Some(false)),
            (json!("1"), Some(true)),
            (json!(""), None),
        ] {
            let loose: Loose = bind(json!({"enabled": raw})).unwrap();
            assert_eq!(loose.enabled, expected);
        }
        let loose: Loose = bind(json!({})).unwrap();
        assert!(loose.enabled.is_none());
        assert!(bind::<Loose>(json!({"enabled": 2})).is_err());
    }
}
