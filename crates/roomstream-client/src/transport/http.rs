//! reqwest-backed transport.
//!
//! - Join: `POST rooms_url` with form `uri=...`
//! - Send: `POST chat_messages_url` with form `text=...`
//! - Stream: `GET stream.chat_messages_url`, body re-sliced into chunks of at
//!   most `read_chunk_bytes`
//!
//! Every request carries the bearer token handed to `HttpTransport::new`.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{BoxStream, StreamExt};
use reqwest::header::ACCEPT;
use reqwest::{Client, Response, StatusCode};
use tracing::debug;

use roomstream_core::error::{Result, RoomStreamError};
use roomstream_core::protocol::{parse_join_response, RoomIdentity};

use crate::config::schema::room_url;
use crate::config::ClientConfig;
use crate::transport::{BoundedChunks, ChatTransport, ChunkSource};

#[derive(Clone)]
pub struct HttpTransport {
    http: Client,
    token: String,
    rooms_url: String,
    chat_messages_url: String,
    stream_url: String,
    read_chunk_bytes: usize,
}

impl HttpTransport {
    pub fn new(cfg: &ClientConfig, token: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_millis(cfg.api.connect_timeout_ms))
            .build()
            .map_err(|e| RoomStreamError::Config(format!("http client build failed: {e}")))?;

        Ok(Self {
            http,
            token: token.into(),
            rooms_url: cfg.api.rooms_url.clone(),
            chat_messages_url: cfg.api.chat_messages_url.clone(),
            stream_url: cfg.stream.chat_messages_url.clone(),
            read_chunk_bytes: cfg.stream.read_chunk_bytes,
        })
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn join(&self, room_uri: &str) -> Result<RoomIdentity> {
        let resp = self
            .http
            .post(&self.rooms_url)
            .bearer_auth(&self.token)
            .form(&[("uri", room_uri)])
            .send()
            .await
            .map_err(|e| RoomStreamError::Transport(format!("join request failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| RoomStreamError::Transport(format!("join response read failed: {e}")))?;
        debug!(%status, len = body.len(), "join response");

        join_outcome(status, &body, room_uri)
    }

    async fn send(&self, room_id: &str, text: &str) -> Result<()> {
        let url = room_url(&self.chat_messages_url, room_id);
        self.http
            .post(&url)
            .bearer_auth(&self.token)
            .form(&[("text", text)])
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(|e| RoomStreamError::Send(e.to_string()))?;
        Ok(())
    }

    async fn open_stream(&self, room_id: &str) -> Result<Box<dyn ChunkSource>> {
        let url = room_url(&self.stream_url, room_id);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(|e| RoomStreamError::Transport(format!("stream open failed: {e}")))?;

        Ok(Box::new(HttpChunkSource::from_response(response, self.read_chunk_bytes)))
    }
}

/// Map a join response to an identity or error.
///
/// An `error` body wins over the status code (`Room`); any other non-2xx
/// status is a `Transport` failure.
pub fn join_outcome(status: StatusCode, body: &[u8], room_uri: &str) -> Result<RoomIdentity> {
    let parsed = parse_join_response(body, room_uri);
    if status.is_success() || matches!(parsed, Err(RoomStreamError::Room(_))) {
        return parsed;
    }
    Err(RoomStreamError::Transport(format!("join failed: HTTP {status}")))
}

/// Streaming response body with bounded chunk size.
pub type HttpChunkSource = BoundedChunks<BoxStream<'static, Result<Bytes>>>;

impl HttpChunkSource {
    pub fn from_response(response: Response, max_chunk: usize) -> Self {
        let body = response
            .bytes_stream()
            .map(|item| {
                item.map_err(|e| RoomStreamError::Transport(format!("stream read failed: {e}")))
            })
            .boxed();
        BoundedChunks::new(body, max_chunk)
    }
}
