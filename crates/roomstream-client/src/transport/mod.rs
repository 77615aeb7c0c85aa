//! Transport seam.
//!
//! The session and read loop only need three request shapes (join, send,
//! open a stream) and "give me the next chunk". `http` provides the
//! reqwest-backed implementation, `chunks` bounds read sizes over any byte
//! stream; tests plug in fakes.

pub mod chunks;
pub mod http;

use async_trait::async_trait;
use bytes::Bytes;

use roomstream_core::error::Result;
use roomstream_core::protocol::RoomIdentity;

pub use chunks::BoundedChunks;
pub use http::{join_outcome, HttpChunkSource, HttpTransport};

/// A streaming response body, read in bounded chunks.
#[async_trait]
pub trait ChunkSource: Send {
    /// Next chunk of the body. An empty chunk means the peer closed the stream.
    async fn read_chunk(&mut self) -> Result<Bytes>;
}

#[async_trait]
impl<S: ChunkSource + ?Sized> ChunkSource for Box<S> {
    async fn read_chunk(&mut self) -> Result<Bytes> {
        (**self).read_chunk().await
    }
}

/// Chat API requests used by a `RoomSession`.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Join (or look up) a room by uri.
    async fn join(&self, room_uri: &str) -> Result<RoomIdentity>;

    /// Post one chat message to a room.
    async fn send(&self, room_id: &str, text: &str) -> Result<()>;

    /// Open the persistent message stream of a room.
    async fn open_stream(&self, room_id: &str) -> Result<Box<dyn ChunkSource>>;
}
