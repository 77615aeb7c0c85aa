//! Room sessions.

mod room;

pub use room::RoomSession;
