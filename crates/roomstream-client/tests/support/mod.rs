//! In-process fakes for the transport seam.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Map;

use roomstream_client::{ChatTransport, ChunkSource};
use roomstream_core::error::{Result, RoomStreamError};
use roomstream_core::protocol::RoomIdentity;

pub fn room(id: &str, uri: &str) -> RoomIdentity {
    RoomIdentity {
        id: id.into(),
        uri: uri.into(),
        extra: Map::new(),
    }
}

/// One scripted read.
pub enum Step {
    Chunk(Bytes),
    Fail(RoomStreamError),
    /// Never resolves.
    Stall,
}

pub fn chunk(s: &str) -> Step {
    Step::Chunk(Bytes::copy_from_slice(s.as_bytes()))
}

/// Chunk source replaying a script, then EOF. Flags `released` on drop.
pub struct ScriptedSource {
    steps: VecDeque<Step>,
    released: Arc<AtomicBool>,
}

impl ScriptedSource {
    pub fn new(steps: Vec<Step>) -> (Self, Arc<AtomicBool>) {
        let released = Arc::new(AtomicBool::new(false));
        (
            Self {
                steps: steps.into(),
                released: Arc::clone(&released),
            },
            released,
        )
    }
}

impl Drop for ScriptedSource {
    fn drop(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ChunkSource for ScriptedSource {
    async fn read_chunk(&mut self) -> Result<Bytes> {
        match self.steps.pop_front() {
            Some(Step::Chunk(b)) => Ok(b),
            Some(Step::Fail(e)) => Err(e),
            Some(Step::Stall) => std::future::pending().await,
            None => Ok(Bytes::new()),
        }
    }
}

/// Fake chat API recording every call in order.
#[derive(Default)]
pub struct FakeTransport {
    calls: Mutex<Vec<String>>,
    join_results: Mutex<VecDeque<Result<RoomIdentity>>>,
    send_error: Mutex<Option<RoomStreamError>>,
    streams: Mutex<VecDeque<ScriptedSource>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_join(&self, res: Result<RoomIdentity>) {
        self.join_results.lock().unwrap().push_back(res);
    }

    pub fn fail_sends(&self, err: RoomStreamError) {
        *self.send_error.lock().unwrap() = Some(err);
    }

    pub fn push_stream(&self, steps: Vec<Step>) -> Arc<AtomicBool> {
        let (source, released) = ScriptedSource::new(steps);
        self.streams.lock().unwrap().push_back(source);
        released
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ChatTransport for FakeTransport {
    async fn join(&self, room_uri: &str) -> Result<RoomIdentity> {
        self.record(format!("join:{room_uri}"));
        // stay in flight across one poll so concurrent callers overlap
        tokio::task::yield_now().await;
        self.join_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RoomStreamError::Internal("no scripted join".into())))
    }

    async fn send(&self, room_id: &str, text: &str) -> Result<()> {
        self.record(format!("send:{room_id}:{text}"));
        match self.send_error.lock().unwrap().clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn open_stream(&self, room_id: &str) -> Result<Box<dyn ChunkSource>> {
        self.record(format!("open:{room_id}"));
        let source = self
            .streams
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| RoomStreamError::Transport("no scripted stream".into()))?;
        Ok(Box::new(source))
    }
}
