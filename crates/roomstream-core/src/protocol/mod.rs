//! Stream protocol modules.
//!
//! - `framer`: detects complete top-level JSON object spans in a chunked
//!   byte stream (brace counting, or string-aware scanning).
//! - `message`: decodes one span into a `Message`.
//! - `room`: room identity and join-response parsing.
//! - `chat`: typed view over chat message payloads.
//!
//! All parsers are panic-free: malformed input is reported as
//! `RoomStreamError` and never stops the stream by itself.

pub mod chat;
pub mod framer;
pub mod message;
pub mod room;

pub use chat::{ChatMessage, ChatUser};
pub use framer::{new_framer, BraceFramer, Framer, FramingMode, StringAwareFramer};
pub use message::{decode_message, Message};
pub use room::{parse_join_response, RoomIdentity};
