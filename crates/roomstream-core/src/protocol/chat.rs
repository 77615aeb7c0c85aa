//! Typed view over chat message payloads.
//!
//! Optional: the stream pipeline only deals in `Message`. Consumers that want
//! named fields call `message.parse_as::<ChatMessage>()`.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub html: Option<String>,
    /// ISO-8601 timestamp as sent by the server.
    #[serde(default)]
    pub sent: Option<String>,
    #[serde(default)]
    pub from_user: Option<ChatUser>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatUser {
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl ChatMessage {
    /// `username: text`, or just the text when the sender is unknown.
    pub fn display_line(&self) -> String {
        match &self.from_user {
            Some(u) => format!("{}: {}", u.username, self.text),
            None => self.text.clone(),
        }
    }
}
