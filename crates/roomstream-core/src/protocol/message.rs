//! Decoded stream messages.
//!
//! The core assumes no schema beyond "a JSON object"; fields such as `text`
//! are for consumers to interpret.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, RoomStreamError};

/// One decoded JSON object from the stream.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Message(Map<String, Value>);

impl Message {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Convenience accessor for the `text` field, when it is a string.
    pub fn text(&self) -> Option<&str> {
        self.0.get("text").and_then(Value::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Deserialize into a typed view (e.g. `ChatMessage`).
    pub fn parse_as<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.0.clone()))
            .map_err(|e| RoomStreamError::Decode(format!("typed view: {e}")))
    }
}

impl From<Map<String, Value>> for Message {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Decode one framed span: UTF-8 first, then a JSON object.
pub fn decode_message(span: &[u8]) -> Result<Message> {
    let text = std::str::from_utf8(span)
        .map_err(|e| RoomStreamError::Decode(format!("invalid utf-8: {e}")))?;

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(fields)) => Ok(Message(fields)),
        Ok(other) => Err(RoomStreamError::Decode(format!(
            "expected JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(RoomStreamError::Decode(format!("invalid json: {e}"))),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
