//! Top-level facade crate for roomstream.
//!
//! Re-exports core types and the client library so users can depend on a single crate.

pub mod core {
    pub use roomstream_core::*;
}

pub mod client {
    pub use roomstream_client::*;
}
