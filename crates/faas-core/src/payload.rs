//! Loosely-typed invocation payload with typed field accessors

use crate::error::{FaasError, FaasResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Field map supplied by the caller for a single invocation.
///
/// Accessors treat an explicit `null` the same as an absent field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, JsonValue>);

impl Payload {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a payload from an arbitrary JSON value. `null` yields an empty
    /// payload; anything other than an object is rejected.
    pub fn from_value(value: JsonValue) -> FaasResult<Self> {
        match value {
            JsonValue::Object(map) => Ok(Self(map)),
            JsonValue::Null => Ok(Self::new()),
            other => Err(FaasError::parse(
                "<payload>",
                format!("expected a JSON object, got {}", type_name(&other)),
            )),
        }
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<JsonValue>) {
        self.0.insert(field.into(), value.into());
    }

    /// Raw access, `None` for absent or `null` fields.
    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.0.get(field).filter(|v| !v.is_null())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Extract a required string field.
    pub fn required_str(&self, field: &str) -> FaasResult<String> {
        match self.get(field) {
            Some(JsonValue::String(s)) => Ok(s.clone()),
            Some(other) => Err(FaasError::parse(
                field,
                format!("expected a string, got {}", type_name(other)),
            )),
            None => Err(FaasError::parse(field, "is missing")),
        }
    }

    /// Extract an optional string field; a present value of another shape is
    /// still an error.
    pub fn optional_str(&self, field: &str) -> FaasResult<Option<String>> {
        match self.get(field) {
            Some(JsonValue::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(FaasError::parse(
                field,
                format!("expected a string, got {}", type_name(other)),
            )),
            None => Ok(None),
        }
    }

    /// Optional string field defaulting to the empty string.
    pub fn str_or_default(&self, field: &str) -> FaasResult<String> {
        Ok(self.optional_str(field)?.unwrap_or_default())
    }

    /// Optional field of any shape.
    pub fn optional_value(&self, field: &str) -> Option<JsonValue> {
        self.get(field).cloned()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, JsonValue> {
        &self.0
    }

    pub fn into_value(self) -> JsonValue {
        JsonValue::Object(self.0)
    }
}

impl From<Map<String, JsonValue>> for Payload {
    fn from(map: Map<String, JsonValue>) -> Self {
        Self(map)
    }
}

impl TryFrom<JsonValue> for Payload {
    type Error = FaasError;

    fn try_from(value: JsonValue) -> FaasResult<Self> {
        Self::from_value(value)
    }
}

fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
