//! Shared validation helpers for inbound HTTP adapters.
//!
//! Errors carry a `details` object naming the offending field, a stable
//! machine code, and the payload index for batch bodies.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value, json};

use crate::domain::{Error, InteractionValidationError};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    InvalidTimestamp,
    TooLong,
    InvalidRequestId,
    MalformedBody,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidTimestamp => "invalid_timestamp",
            Self::TooLong => "too_long",
            Self::InvalidRequestId => "invalid_request_id",
            Self::MalformedBody => "malformed_body",
        }
    }
}

fn details(code: ValidationCode, field: Option<&str>, index: Option<usize>) -> Map<String, Value> {
    let mut map = Map::new();
    if let Some(field) = field {
        map.insert("field".to_owned(), json!(field));
    }
    if let Some(index) = index {
        map.insert("index".to_owned(), json!(index));
    }
    map.insert("code".to_owned(), json!(code.as_str()));
    map
}

/// A required field was absent or null.
pub(crate) fn missing_field_error(field: &str, index: Option<usize>) -> Error {
    let map = details(ValidationCode::MissingField, Some(field), index);
    Error::invalid_request(format!("missing required field: {field}"))
        .with_details(Value::Object(map))
}

/// `preferred_time` could not be parsed.
pub(crate) fn invalid_timestamp_error(field: &str, index: Option<usize>, value: &str) -> Error {
    let mut map = details(ValidationCode::InvalidTimestamp, Some(field), index);
    map.insert("value".to_owned(), json!(value));
    Error::invalid_request(format!("{field} must be an ISO 8601 date-time"))
        .with_details(Value::Object(map))
}

/// A value exceeded its column width.
pub(crate) fn too_long_error(err: &InteractionValidationError, index: Option<usize>) -> Error {
    let InteractionValidationError::TooLong { field, max } = err;
    let mut map = details(ValidationCode::TooLong, Some(*field), index);
    map.insert("max".to_owned(), json!(*max));
    Error::invalid_request(err.to_string()).with_details(Value::Object(map))
}

/// The path segment is not a four-digit tracking code.
pub(crate) fn invalid_request_id_error(value: &str) -> Error {
    let mut map = details(ValidationCode::InvalidRequestId, Some("request_id"), None);
    map.insert("value".to_owned(), json!(value));
    Error::invalid_request("Request ID was wrong, check once again!")
        .with_details(Value::Object(map))
}

/// The body or query string could not be decoded.
pub(crate) fn malformed_body_error(reason: impl std::fmt::Display) -> Error {
    let mut map = details(ValidationCode::MalformedBody, None, None);
    map.insert("reason".to_owned(), json!(reason.to_string()));
    Error::invalid_request("request could not be parsed").with_details(Value::Object(map))
}

/// Parse an RFC 3339 timestamp, or a naive ISO 8601 date-time read as UTC.
pub(crate) fn parse_preferred_time(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(timestamp.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|naive| naive.and_utc())
}

/// Parse an optional `preferred_time` from item `index`.
pub(crate) fn parse_optional_preferred_time(
    value: Option<&str>,
    index: usize,
) -> Result<Option<DateTime<Utc>>, Error> {
    value
        .map(|raw| {
            parse_preferred_time(raw)
                .ok_or_else(|| invalid_timestamp_error("preferred_time", Some(index), raw))
        })
        .transpose()
}
