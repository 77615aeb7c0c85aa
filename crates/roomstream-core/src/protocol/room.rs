//! Room identity returned by a successful join.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, RoomStreamError};

/// Resolved room. Immutable once a session has cached it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomIdentity {
    /// Server-side room id; scopes send and subscribe.
    pub id: String,
    /// Room uri (e.g. `org/room`). Filled from the join request when absent.
    #[serde(default)]
    pub uri: String,
    /// Any other server metadata, kept opaque.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Parse a join response body.
///
/// An `error` field means the server refused the join (`Room`), regardless
/// of any other fields present. A body that is not a JSON object is a
/// broken exchange (`Transport`), not a local decode failure.
pub fn parse_join_response(body: &[u8], requested_uri: &str) -> Result<RoomIdentity> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| RoomStreamError::Transport(format!("join response: {e}")))?;

    let Value::Object(fields) = value else {
        return Err(RoomStreamError::Transport("join response is not an object".into()));
    };

    if let Some(err) = fields.get("error") {
        let msg = match err {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(RoomStreamError::Room(msg));
    }

    let mut room: RoomIdentity = serde_json::from_value(Value::Object(fields))
        .map_err(|e| RoomStreamError::Room(format!("join response missing room id: {e}")))?;
    if room.uri.is_empty() {
        room.uri = requested_uri.to_string();
    }
    Ok(room)
}
