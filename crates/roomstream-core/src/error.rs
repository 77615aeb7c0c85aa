//! Shared error type across roomstream crates.

use thiserror::Error;

/// Stable error kinds (what UI/CLI layers branch on).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// One framed span was not valid UTF-8 / JSON.
    Decode,
    /// A pending span outgrew the configured limit.
    FrameOverflow,
    /// The server rejected the room join.
    Room,
    /// Sending a chat message failed.
    Send,
    /// Network / HTTP failure on join or subscribe.
    Transport,
    /// The caller cancelled the operation.
    Cancelled,
    /// The message consumer went away.
    SinkClosed,
    /// Invalid configuration.
    Config,
    /// Anything else.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and by external collaborators.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Decode => "DECODE",
            ErrorCode::FrameOverflow => "FRAME_OVERFLOW",
            ErrorCode::Room => "ROOM",
            ErrorCode::Send => "SEND",
            ErrorCode::Transport => "TRANSPORT",
            ErrorCode::Cancelled => "CANCELLED",
            ErrorCode::SinkClosed => "SINK_CLOSED",
            ErrorCode::Config => "CONFIG",
            ErrorCode::Internal => "INTERNAL",
        }
    }

    /// Local errors affect one span only; the stream keeps going.
    pub fn is_local(self) -> bool {
        matches!(self, ErrorCode::Decode | ErrorCode::FrameOverflow)
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, RoomStreamError>;

/// Unified error type used by core and client.
///
/// Payloads are plain strings so the error is `Clone`: every waiter on a
/// shared in-flight join receives the same failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomStreamError {
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("frame overflow: pending span exceeded {limit} bytes")]
    FrameOverflow { limit: usize },
    #[error("room error: {0}")]
    Room(String),
    #[error("send failed: {0}")]
    Send(String),
    #[error("transport: {0}")]
    Transport(String),
    #[error("cancelled")]
    Cancelled,
    #[error("sink closed")]
    SinkClosed,
    #[error("config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl RoomStreamError {
    /// Map to a stable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            RoomStreamError::Decode(_) => ErrorCode::Decode,
            RoomStreamError::FrameOverflow { .. } => ErrorCode::FrameOverflow,
            RoomStreamError::Room(_) => ErrorCode::Room,
            RoomStreamError::Send(_) => ErrorCode::Send,
            RoomStreamError::Transport(_) => ErrorCode::Transport,
            RoomStreamError::Cancelled => ErrorCode::Cancelled,
            RoomStreamError::SinkClosed => ErrorCode::SinkClosed,
            RoomStreamError::Config(_) => ErrorCode::Config,
            RoomStreamError::Internal(_) => ErrorCode::Internal,
        }
    }
}
