//! roomstream core: stream framing, message decoding, and the shared error type.
//!
//! This crate turns an arbitrarily chunked byte stream of concatenated JSON
//! objects into discrete decoded messages. It carries no transport or runtime
//! dependencies so the same framer can sit behind any byte source.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed stream data surfaces as `RoomStreamError`, never as a crash.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{ErrorCode, Result, RoomStreamError};
