//! Backend response envelope parsing.
//!
//! Every backend endpoint answers with `{ok, result | stats, error}`. An
//! envelope is only successful when `ok` is exactly `true`, whatever the
//! HTTP status says.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{BridgeError, Result};
use crate::traits::BackendResponse;

const MAX_ERROR_BODY_CHARS: usize = 200;

/// Decoded backend envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendEnvelope {
    fields: Map<String, Value>,
}

impl BackendEnvelope {
    /// Decode a JSON body into an envelope. The body must be a JSON object.
    pub fn decode(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body).map_err(|e| {
            BridgeError::backend_logical(format!("backend returned invalid JSON: {}", e))
        })?;

        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(BridgeError::backend_logical(format!(
                "backend returned a JSON {} instead of an envelope object",
                json_kind(&other)
            ))),
        }
    }

    /// Whether the backend flagged success.
    pub fn is_ok(&self) -> bool {
        matches!(self.fields.get("ok"), Some(Value::Bool(true)))
    }

    /// Error message carried by the envelope, if any.
    pub fn error_message(&self) -> Option<String> {
        match self.fields.get("error")? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Payload of a successful envelope: `result`, else `stats`, else the
    /// envelope itself (legacy shapes put data at the top level).
    pub fn into_payload(mut self) -> Result<Value> {
        if !self.is_ok() {
            let message = self
                .error_message()
                .unwrap_or_else(|| "backend reported failure".to_string());
            return Err(BridgeError::backend_logical(message));
        }

        for key in ["result", "stats"] {
            match self.fields.remove(key) {
                Some(Value::Null) | None => continue,
                Some(payload) => return Ok(payload),
            }
        }
        Ok(Value::Object(self.fields))
    }
}

/// Classify the HTTP status, decode the envelope and return its payload.
///
/// Only a 2xx body is ever decoded; any other status is an HTTP error.
pub fn parse_response(response: &BackendResponse) -> Result<Value> {
    if !(200..300).contains(&response.status) {
        return Err(BridgeError::backend_http(
            response.status,
            http_error_message(&response.body),
        ));
    }

    let envelope = BackendEnvelope::decode(&response.body)?;
    debug!(ok = envelope.is_ok(), "decoded backend envelope");
    envelope.into_payload()
}

fn http_error_message(body: &str) -> String {
    if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) {
        if let Some(Value::String(error)) = fields.get("error") {
            return error.clone();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    let mut message: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
    if trimmed.chars().count() > MAX_ERROR_BODY_CHARS {
        message.push_str("...");
    }
    message
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
