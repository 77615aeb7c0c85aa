//! roomstream client library entry.
//!
//! Wires the transport seam, room session, and streaming read loop into a
//! chat client. Consumed by the `roomstream` binary and by integration tests.

pub mod config;
pub mod session;
pub mod stream;
pub mod transport;

pub use config::ClientConfig;
pub use session::RoomSession;
pub use stream::{join_consumer, ChannelSink, ChatStreamClient, FnSink, MessageSink, StreamEnded, StreamOptions};
pub use transport::{ChatTransport, ChunkSource, HttpTransport};
