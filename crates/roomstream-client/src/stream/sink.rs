use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use roomstream_core::error::{Result, RoomStreamError};
use roomstream_core::protocol::Message;

/// Consumer of decoded messages, called once per message in stream order.
///
/// The read loop awaits `accept` before reading the next chunk, so a slow
/// sink slows the stream down instead of buffering without bound.
#[async_trait]
pub trait MessageSink: Send {
    async fn accept(&mut self, message: Message) -> Result<()>;
}

/// Closure sink. Runs inline on the read loop.
pub struct FnSink<F>(pub F);

#[async_trait]
impl<F> MessageSink for FnSink<F>
where
    F: FnMut(Message) + Send,
{
    async fn accept(&mut self, message: Message) -> Result<()> {
        (self.0)(message);
        Ok(())
    }
}

/// Bounded channel sink.
///
/// Backpressure: when the channel is full the read loop waits for the
/// receiver. A dropped receiver ends the loop with `SinkClosed`.
pub struct ChannelSink {
    tx: mpsc::Sender<Message>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<Message>) -> Self {
        Self { tx }
    }

    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Message>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }
}

#[async_trait]
impl MessageSink for ChannelSink {
    async fn accept(&mut self, message: Message) -> Result<()> {
        self.tx
            .send(message)
            .await
            .map_err(|_| RoomStreamError::SinkClosed)
    }
}

/// Wait for the task draining a `ChannelSink` receiver.
///
/// A panicked or aborted consumer is logged, not propagated: the stream
/// outcome is already decided by the time the consumer is joined.
pub async fn join_consumer(handle: JoinHandle<()>) -> bool {
    match handle.await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, panicked = e.is_panic(), "message consumer task failed");
            false
        }
    }
}
