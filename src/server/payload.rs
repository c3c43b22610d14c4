use serde_json::{Map, Value};

use super::error::RelayError;

/// Caller body split into the reserved `stream` flag and the forwarded fields.
#[derive(Debug, PartialEq)]
pub struct ChatPayload {
    pub stream: bool,
    pub fields: Map<String, Value>,
}

impl ChatPayload {
    /// Parse an inbound body. A JSON string body is decoded once more, and
    /// anything other than an object is treated as an empty mapping.
    pub fn parse(raw: &[u8]) -> Result<Self, RelayError> {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::from_value(Value::Null));
        }

        let value: Value = serde_json::from_slice(raw).map_err(RelayError::InvalidBody)?;
        let value = match value {
            Value::String(text) => serde_json::from_str(&text).map_err(RelayError::InvalidBody)?,
            other => other,
        };

        Ok(Self::from_value(value))
    }

    pub fn from_value(value: Value) -> Self {
        let mut fields = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let stream = fields.shift_remove("stream").is_some_and(|v| is_truthy(&v));
        Self { stream, fields }
    }

    /// Upstream request body: the forwarded fields plus a boolean `stream`.
    pub fn into_upstream_body(self) -> Value {
        let mut fields = self.fields;
        fields.insert("stream".to_string(), Value::Bool(self.stream));
        Value::Object(fields)
    }
}

/// JavaScript-style truthiness, used to coerce the `stream` flag.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
