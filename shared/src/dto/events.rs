//! # Relay Socket Event Contract
//!
//! Events exchanged with the presence relay over a persistent WebSocket.
//! Every frame is a JSON envelope `{"event": <name>, "data": <payload>}`.
//! Event names keep their historical spelling with spaces (`"join chat"`,
//! `"stop typing"`, `"new message"`, `"message received"`).
//!
//! The `new message` payload is carried as raw JSON: the relay only needs
//! `sender.id` and `chat.users[].id` for routing and forwards the payload
//! untouched, so clients can evolve the message shape without a relay
//! change. [`RelayedMessage`] is the lenient view used for routing.

use serde::{Deserialize, Serialize};

/// Identity presented during the `setup` handshake
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetupPayload {
    pub id: i64,
}

/// Events a client sends to the relay
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// Authenticate this connection and join the private identity channel
    #[serde(rename = "setup")]
    Setup(SetupPayload),
    /// Join the channel scoping typing indicators to one chat
    #[serde(rename = "join chat")]
    JoinChat(i64),
    #[serde(rename = "typing")]
    Typing(i64),
    #[serde(rename = "stop typing")]
    StopTyping(i64),
    /// An enriched, already-persisted message to fan out to the other
    /// members' identity channels
    #[serde(rename = "new message")]
    NewMessage(serde_json::Value),
}

/// Events the relay pushes to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// Acknowledges a successful `setup` handshake
    #[serde(rename = "connected")]
    Connected,
    #[serde(rename = "typing")]
    Typing(i64),
    #[serde(rename = "stop typing")]
    StopTyping(i64),
    #[serde(rename = "message received")]
    MessageReceived(serde_json::Value),
}

/// Minimal reference to a user inside a relayed payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRef {
    pub id: i64,
}

/// Lenient chat view inside a relayed payload; only membership matters here
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelayedChat {
    #[serde(default)]
    pub users: Option<Vec<UserRef>>,
}

/// Lenient routing view of a `new message` payload.
///
/// Anything beyond `sender` and `chat.users` is opaque to the relay. Missing
/// fields deserialize to `None` so the relay can log-and-drop malformed
/// payloads instead of failing the whole frame.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelayedMessage {
    #[serde(default)]
    pub sender: Option<UserRef>,
    #[serde(default)]
    pub chat: Option<RelayedChat>,
}
