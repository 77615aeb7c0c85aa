//! Bounded chunk reads over any byte stream.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{Stream, StreamExt};

use roomstream_core::error::Result;

use crate::transport::ChunkSource;

/// Re-slices a byte stream so no chunk exceeds `max_chunk` bytes.
///
/// Empty items from the inner stream are skipped; only the end of the
/// stream produces the empty (EOF) chunk. The inner stream is not polled
/// again once it has ended.
pub struct BoundedChunks<S> {
    inner: S,
    pending: Bytes,
    max_chunk: usize,
    done: bool,
}

impl<S> BoundedChunks<S> {
    pub fn new(inner: S, max_chunk: usize) -> Self {
        Self {
            inner,
            pending: Bytes::new(),
            max_chunk: max_chunk.max(1),
            done: false,
        }
    }
}

#[async_trait]
impl<S> ChunkSource for BoundedChunks<S>
where
    S: Stream<Item = Result<Bytes>> + Send + Unpin,
{
    async fn read_chunk(&mut self) -> Result<Bytes> {
        loop {
            if !self.pending.is_empty() {
                let n = self.pending.len().min(self.max_chunk);
                return Ok(self.pending.split_to(n));
            }
            if self.done {
                return Ok(Bytes::new());
            }
            match self.inner.next().await {
                Some(item) => self.pending = item?,
                None => self.done = true,
            }
        }
    }
}
