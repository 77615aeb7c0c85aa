use serde::Deserialize;

use roomstream_core::error::{Result, RoomStreamError};
use roomstream_core::protocol::framer::{FramingMode, DEFAULT_MAX_SPAN_BYTES};

use crate::stream::StreamOptions;

/// Placeholder substituted with the resolved room id.
pub const ROOM_ID_PLACEHOLDER: &str = "{room_id}";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub version: u32,

    #[serde(default)]
    pub api: ApiSection,

    #[serde(default)]
    pub stream: StreamSection,

    #[serde(default)]
    pub auth: AuthSection,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: 1,
            api: ApiSection::default(),
            stream: StreamSection::default(),
            auth: AuthSection::default(),
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(RoomStreamError::Config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }
        self.api.validate()?;
        self.stream.validate()?;
        self.auth.validate()?;
        Ok(())
    }

    pub fn stream_options(&self) -> StreamOptions {
        StreamOptions {
            framing: self.stream.framing,
            max_span_bytes: self.stream.max_span_bytes,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiSection {
    #[serde(default = "default_rooms_url")]
    pub rooms_url: String,

    #[serde(default = "default_chat_messages_url")]
    pub chat_messages_url: String,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            rooms_url: default_rooms_url(),
            chat_messages_url: default_chat_messages_url(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

impl ApiSection {
    pub fn validate(&self) -> Result<()> {
        check_url("api.rooms_url", &self.rooms_url)?;
        check_room_template("api.chat_messages_url", &self.chat_messages_url)?;
        if !(1000..=120000).contains(&self.connect_timeout_ms) {
            return Err(RoomStreamError::Config(
                "api.connect_timeout_ms must be between 1000 and 120000".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StreamSection {
    #[serde(default = "default_stream_chat_messages_url")]
    pub chat_messages_url: String,

    #[serde(default = "default_read_chunk_bytes")]
    pub read_chunk_bytes: usize,

    #[serde(default = "default_max_span_bytes")]
    pub max_span_bytes: usize,

    #[serde(default)]
    pub framing: FramingMode,
}

impl Default for StreamSection {
    fn default() -> Self {
        Self {
            chat_messages_url: default_stream_chat_messages_url(),
            read_chunk_bytes: default_read_chunk_bytes(),
            max_span_bytes: default_max_span_bytes(),
            framing: FramingMode::default(),
        }
    }
}

impl StreamSection {
    pub fn validate(&self) -> Result<()> {
        check_room_template("stream.chat_messages_url", &self.chat_messages_url)?;
        if !(1..=65536).contains(&self.read_chunk_bytes) {
            return Err(RoomStreamError::Config(
                "stream.read_chunk_bytes must be between 1 and 65536".into(),
            ));
        }
        if self.max_span_bytes < 64 {
            return Err(RoomStreamError::Config(
                "stream.max_span_bytes must be at least 64".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthSection {
    /// Environment variable holding the bearer token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for AuthSection {
    fn default() -> Self {
        Self {
            token_env: default_token_env(),
        }
    }
}

impl AuthSection {
    pub fn validate(&self) -> Result<()> {
        if self.token_env.trim().is_empty() {
            return Err(RoomStreamError::Config("auth.token_env must not be empty".into()));
        }
        Ok(())
    }
}

/// Expand a `{room_id}` url template.
pub fn room_url(template: &str, room_id: &str) -> String {
    template.replace(ROOM_ID_PLACEHOLDER, room_id)
}

fn check_url(field: &str, url: &str) -> Result<()> {
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        Err(RoomStreamError::Config(format!("{field} must be an http(s) url")))
    }
}

fn check_room_template(field: &str, url: &str) -> Result<()> {
    check_url(field, url)?;
    if !url.contains(ROOM_ID_PLACEHOLDER) {
        return Err(RoomStreamError::Config(format!(
            "{field} must contain {ROOM_ID_PLACEHOLDER}"
        )));
    }
    Ok(())
}

fn default_rooms_url() -> String {
    "https://api.gitter.im/v1/rooms".into()
}
fn default_chat_messages_url() -> String {
    "https://api.gitter.im/v1/rooms/{room_id}/chatMessages".into()
}
fn default_connect_timeout_ms() -> u64 {
    10000
}
fn default_stream_chat_messages_url() -> String {
    "https://stream.gitter.im/v1/rooms/{room_id}/chatMessages".into()
}
fn default_read_chunk_bytes() -> usize {
    10
}
fn default_max_span_bytes() -> usize {
    DEFAULT_MAX_SPAN_BYTES
}
fn default_token_env() -> String {
    "GITTER".into()
}
