//! Incremental JSON object framing over an arbitrarily chunked byte stream.
//!
//! Framing rules (shared by both framers):
//! - Only bytes inside a top-level object (`depth > 0`, plus the closing
//!   brace) are buffered; whitespace and heartbeats between objects are dropped.
//! - Emission is per chunk: after a whole chunk is consumed, a non-empty
//!   buffer at `depth == 0` is emitted as ONE span. Two objects completing
//!   inside the same chunk therefore come out concatenated.
//! - A stray `}` at depth 0 is ignored (depth never goes negative).
//! - Data still pending when the stream ends is never emitted.

use bytes::{BufMut, Bytes, BytesMut};
use serde::Deserialize;

use crate::error::{Result, RoomStreamError};

/// Default cap for one pending span.
pub const DEFAULT_MAX_SPAN_BYTES: usize = 1024 * 1024;

/// A stream framer: bytes in, complete object spans out.
pub trait Framer: Send {
    /// Consume one chunk. Returns the span completed by this chunk, if any.
    ///
    /// On `FrameOverflow` the pending buffer has already been discarded and
    /// the framer is idle again; callers may keep feeding.
    fn feed(&mut self, chunk: &[u8]) -> Result<Option<Bytes>>;

    /// Current object nesting depth.
    fn depth(&self) -> usize;

    /// Bytes buffered for the object in progress.
    fn pending_len(&self) -> usize;

    /// Drop any partial object and return to idle.
    fn reset(&mut self);

    /// `true` when no object is in progress.
    fn is_idle(&self) -> bool {
        self.depth() == 0 && self.pending_len() == 0
    }
}

/// Which framer a stream uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FramingMode {
    /// Plain brace counting. Braces inside string literals shift the depth.
    #[default]
    Brace,
    /// Brace counting that skips string literals (quote/escape aware).
    StringAware,
}

/// Build a framer for `mode`.
pub fn new_framer(mode: FramingMode, max_span_bytes: usize) -> Box<dyn Framer> {
    match mode {
        FramingMode::Brace => Box::new(BraceFramer::with_limit(max_span_bytes)),
        FramingMode::StringAware => Box::new(StringAwareFramer::with_limit(max_span_bytes)),
    }
}

/// Pending buffer + depth shared by both framers.
#[derive(Debug)]
struct SpanBuffer {
    depth: usize,
    buf: BytesMut,
    max_span_bytes: usize,
}

impl SpanBuffer {
    fn new(max_span_bytes: usize) -> Self {
        Self {
            depth: 0,
            buf: BytesMut::new(),
            max_span_bytes,
        }
    }

    fn open(&mut self) {
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn push_if_open(&mut self, b: u8) {
        if self.depth > 0 {
            self.buf.put_u8(b);
        }
    }

    /// End-of-chunk bookkeeping: flush a finished span or police the limit.
    fn finish_chunk(&mut self) -> Result<Option<Bytes>> {
        if self.depth > 0 {
            if self.buf.len() > self.max_span_bytes {
                let limit = self.max_span_bytes;
                self.reset();
                return Err(RoomStreamError::FrameOverflow { limit });
            }
            return Ok(None);
        }
        if self.buf.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.buf.split().freeze()))
    }

    fn reset(&mut self) {
        self.depth = 0;
        self.buf.clear();
    }
}

/// Brace-counting framer with no awareness of string literals.
#[derive(Debug)]
pub struct BraceFramer {
    span: SpanBuffer,
}

impl BraceFramer {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MAX_SPAN_BYTES)
    }

    pub fn with_limit(max_span_bytes: usize) -> Self {
        Self {
            span: SpanBuffer::new(max_span_bytes),
        }
    }
}

impl Default for BraceFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framer for BraceFramer {
    fn feed(&mut self, chunk: &[u8]) -> Result<Option<Bytes>> {
        for &b in chunk {
            if b == b'{' {
                self.span.open();
            }
            // the closing brace is appended before depth drops
            self.span.push_if_open(b);
            if b == b'}' {
                self.span.close();
            }
        }
        self.span.finish_chunk()
    }

    fn depth(&self) -> usize {
        self.span.depth
    }

    fn pending_len(&self) -> usize {
        self.span.buf.len()
    }

    fn reset(&mut self) {
        self.span.reset();
    }
}

/// Brace-counting framer that ignores braces inside JSON string literals.
///
/// Emission granularity is identical to [`BraceFramer`]; only depth
/// tracking differs.
#[derive(Debug)]
pub struct StringAwareFramer {
    span: SpanBuffer,
    in_string: bool,
    escaped: bool,
}

impl StringAwareFramer {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MAX_SPAN_BYTES)
    }

    pub fn with_limit(max_span_bytes: usize) -> Self {
        Self {
            span: SpanBuffer::new(max_span_bytes),
            in_string: false,
            escaped: false,
        }
    }

    fn scan_string_byte(&mut self, b: u8) {
        self.span.buf.put_u8(b);
        if self.escaped {
            self.escaped = false;
        } else if b == b'\\' {
            self.escaped = true;
        } else if b == b'"' {
            self.in_string = false;
        }
    }
}

impl Default for StringAwareFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framer for StringAwareFramer {
    fn feed(&mut self, chunk: &[u8]) -> Result<Option<Bytes>> {
        for &b in chunk {
            if self.in_string {
                self.scan_string_byte(b);
                continue;
            }
            if b == b'{' {
                self.span.open();
            }
            self.span.push_if_open(b);
            match b {
                b'"' if self.span.depth > 0 => self.in_string = true,
                b'}' => self.span.close(),
                _ => {}
            }
        }
        let out = self.span.finish_chunk();
        if out.is_err() {
            self.in_string = false;
            self.escaped = false;
        }
        out
    }

    fn depth(&self) -> usize {
        self.span.depth
    }

    fn pending_len(&self) -> usize {
        self.span.buf.len()
    }

    fn reset(&mut self) {
        self.span.reset();
        self.in_string = false;
        self.escaped = false;
    }
}
