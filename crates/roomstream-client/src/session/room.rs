use std::sync::{Arc, Mutex, MutexGuard};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, Instrument};

use roomstream_core::error::{Result, RoomStreamError};
use roomstream_core::protocol::RoomIdentity;

use crate::stream::{ChatStreamClient, MessageSink, StreamEnded, StreamOptions};
use crate::transport::ChatTransport;

type JoinFuture = Shared<BoxFuture<'static, Result<Arc<RoomIdentity>>>>;

/// Join resolution state. Every in-flight caller awaits the same future.
enum JoinState {
    Unresolved,
    Joining { attempt: u64, fut: JoinFuture },
    Resolved(Arc<RoomIdentity>),
}

struct Inner {
    state: JoinState,
    attempts: u64,
}

/// One room: lazy single-flight join, then send / subscribe on its id.
pub struct RoomSession {
    room_uri: String,
    transport: Arc<dyn ChatTransport>,
    stream: ChatStreamClient,
    // never held across an await
    inner: Mutex<Inner>,
}

impl RoomSession {
    pub fn new(transport: Arc<dyn ChatTransport>, room_uri: impl Into<String>) -> Self {
        Self {
            room_uri: room_uri.into(),
            transport,
            stream: ChatStreamClient::default(),
            inner: Mutex::new(Inner {
                state: JoinState::Unresolved,
                attempts: 0,
            }),
        }
    }

    pub fn with_stream_options(mut self, options: StreamOptions) -> Self {
        self.stream = ChatStreamClient::new(options);
        self
    }

    pub fn room_uri(&self) -> &str {
        &self.room_uri
    }

    /// Cached identity, if a join already succeeded.
    pub fn identity(&self) -> Option<Arc<RoomIdentity>> {
        match &self.lock().state {
            JoinState::Resolved(room) => Some(Arc::clone(room)),
            _ => None,
        }
    }

    pub fn is_joined(&self) -> bool {
        self.identity().is_some()
    }

    /// Resolve the room, joining at most once at a time.
    ///
    /// Concurrent callers share one join request and its outcome. A failed
    /// join is not cached; the next call starts a fresh attempt.
    pub async fn join(&self) -> Result<Arc<RoomIdentity>> {
        let (attempt, fut) = {
            let mut inner = self.lock();
            let in_flight = match &inner.state {
                JoinState::Resolved(room) => return Ok(Arc::clone(room)),
                JoinState::Joining { attempt, fut } => Some((*attempt, fut.clone())),
                JoinState::Unresolved => None,
            };
            match in_flight {
                Some(joining) => joining,
                None => {
                    inner.attempts += 1;
                    let attempt = inner.attempts;
                    let fut = self.start_join();
                    inner.state = JoinState::Joining {
                        attempt,
                        fut: fut.clone(),
                    };
                    (attempt, fut)
                }
            }
        };

        let res = fut.await;

        let mut inner = self.lock();
        let current = matches!(&inner.state, JoinState::Joining { attempt: a, .. } if *a == attempt);
        if current {
            inner.state = match &res {
                Ok(room) => {
                    info!(room_uri = %self.room_uri, room_id = %room.id, "room joined");
                    JoinState::Resolved(Arc::clone(room))
                }
                Err(e) => {
                    debug!(room_uri = %self.room_uri, error = %e, "room join failed");
                    JoinState::Unresolved
                }
            };
        }
        res
    }

    /// Post a message, joining first if needed. No retry.
    pub async fn send(&self, text: &str) -> Result<()> {
        let room = self.join().await?;
        debug!(room_id = %room.id, len = text.len(), "sending message");
        self.transport.send(&room.id, text).await
    }

    /// Join if needed, open the room stream, and deliver messages to `sink`
    /// until the peer closes it, it fails, or `cancel` fires.
    pub async fn subscribe<K>(&self, sink: &mut K, cancel: &CancellationToken) -> Result<StreamEnded>
    where
        K: MessageSink + ?Sized,
    {
        let room = self.join().await?;

        let source = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(RoomStreamError::Cancelled),
            opened = self.transport.open_stream(&room.id) => opened?,
        };
        info!(room_id = %room.id, "stream opened");

        self.stream
            .run(source, sink, cancel)
            .instrument(tracing::info_span!("room_stream", room_id = %room.id))
            .await
    }

    fn start_join(&self) -> JoinFuture {
        let transport = Arc::clone(&self.transport);
        let uri = self.room_uri.clone();
        async move { transport.join(&uri).await.map(Arc::new) }
            .boxed()
            .shared()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
