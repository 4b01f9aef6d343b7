//! Redaction of secrets in payloads before they reach logs or error output

use crate::payload::Payload;
use serde_json::{Map, Value as JsonValue};

/// Payload fields that always carry secrets
const SENSITIVE_FIELDS: &[&str] = &[
    "api_key",
    "api_token",
    "auth_token",
    "account_sid",
    "token",
    "password",
    "secret",
    "authorization",
    "registry_password",
];

/// Substrings that mark a field as sensitive (case-insensitive)
const SENSITIVE_PATTERNS: &[&str] = &["_key", "_token", "_secret", "_password"];

const REDACTED: &str = "***REDACTED***";

pub fn is_sensitive_field(field_name: &str) -> bool {
    let lower = field_name.to_lowercase();
    SENSITIVE_FIELDS.contains(&lower.as_str())
        || SENSITIVE_PATTERNS.iter().any(|p| lower.contains(p))
}

/// Replace scalar values under sensitive keys, recursing into objects and arrays.
pub fn sanitize_json_value(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(map) => {
            let redacted: Map<String, JsonValue> = map
                .iter()
                .map(|(key, val)| {
                    let val = match val {
                        JsonValue::String(_) | JsonValue::Number(_) | JsonValue::Bool(_)
                            if is_sensitive_field(key) =>
                        {
                            JsonValue::String(REDACTED.to_string())
                        }
                        other => sanitize_json_value(other),
                    };
                    (key.clone(), val)
                })
                .collect();
            JsonValue::Object(redacted)
        }
        JsonValue::Array(items) => JsonValue::Array(items.iter().map(sanitize_json_value).collect()),
        other => other.clone(),
    }
}

pub fn sanitize_payload(payload: &Payload) -> JsonValue {
    sanitize_json_value(&JsonValue::Object(payload.as_map().clone()))
}
