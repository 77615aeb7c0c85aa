//! Streaming read loop and message sinks.
//!
//! chunk -> framer -> span -> decoder -> `MessageSink`, strictly in order.

mod client;
mod sink;

pub use client::{ChatStreamClient, StreamEnded, StreamOptions};
pub use sink::{join_consumer, ChannelSink, FnSink, MessageSink};
