use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use roomstream_core::error::{Result, RoomStreamError};
use roomstream_core::protocol::framer::{new_framer, FramingMode, DEFAULT_MAX_SPAN_BYTES};
use roomstream_core::protocol::message::decode_message;

use crate::stream::MessageSink;
use crate::transport::ChunkSource;

/// Framing options for one stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamOptions {
    pub framing: FramingMode,
    pub max_span_bytes: usize,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            framing: FramingMode::Brace,
            max_span_bytes: DEFAULT_MAX_SPAN_BYTES,
        }
    }
}

/// Normal termination: the peer closed the stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamEnded {
    /// Non-empty chunks read.
    pub chunks: u64,
    /// Total bytes read.
    pub bytes: u64,
    /// Messages handed to the sink.
    pub delivered: u64,
    /// Spans dropped as undecodable or oversized.
    pub skipped: u64,
}

/// Read loop over one persistent streaming connection.
#[derive(Debug, Clone, Default)]
pub struct ChatStreamClient {
    options: StreamOptions,
}

impl ChatStreamClient {
    pub fn new(options: StreamOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> StreamOptions {
        self.options
    }

    /// Drive `source` until EOF, a read error, a closed sink, or cancellation.
    ///
    /// Returns `Ok(StreamEnded)` only when the peer closed the stream. The
    /// connection is dropped on every exit path; a partial object pending at
    /// exit is discarded.
    pub async fn run<S, K>(
        &self,
        mut source: S,
        sink: &mut K,
        cancel: &CancellationToken,
    ) -> Result<StreamEnded>
    where
        S: ChunkSource,
        K: MessageSink + ?Sized,
    {
        let mut framer = new_framer(self.options.framing, self.options.max_span_bytes);
        let mut stats = StreamEnded::default();

        loop {
            let read = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(pending = framer.pending_len(), "stream cancelled");
                    return Err(RoomStreamError::Cancelled);
                }
                read = source.read_chunk() => read,
            };

            let chunk = match read {
                Ok(chunk) => chunk,
                Err(e) => {
                    warn!(error = %e, delivered = stats.delivered, "stream read failed");
                    return Err(e);
                }
            };

            if chunk.is_empty() {
                if !framer.is_idle() {
                    debug!(
                        depth = framer.depth(),
                        pending = framer.pending_len(),
                        "stream closed mid-object, partial data dropped"
                    );
                }
                debug!(?stats, "stream closed by peer");
                return Ok(stats);
            }

            stats.chunks += 1;
            stats.bytes += chunk.len() as u64;

            let span = match framer.feed(&chunk) {
                Ok(Some(span)) => span,
                Ok(None) => continue,
                Err(e) => {
                    warn!(error = %e, code = e.code().as_str(), "dropping oversized span");
                    stats.skipped += 1;
                    continue;
                }
            };

            match decode_message(&span) {
                Ok(message) => {
                    debug!(len = span.len(), "message framed");
                    // a full sink must not shield the loop from cancellation
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            debug!(delivered = stats.delivered, "stream cancelled during delivery");
                            return Err(RoomStreamError::Cancelled);
                        }
                        accepted = sink.accept(message) => accepted?,
                    }
                    stats.delivered += 1;
                }
                Err(e) => {
                    warn!(error = %e, len = span.len(), "skipping undecodable span");
                    stats.skipped += 1;
                }
            }
        }
    }
}
