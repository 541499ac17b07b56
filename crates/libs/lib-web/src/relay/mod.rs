//! # Presence Relay
//!
//! Server-side event router translating HTTP-originated writes into
//! low-latency push events over persistent connections.
//!
//! Each connection authenticates once through a `setup` handshake carrying
//! its user id and is joined to that user's private identity channel.
//! `message received` delivery routes by identity, so a member receives
//! pushes on every connection without the relay tracking which chats they
//! are viewing; chat channels exist only to scope typing indicators.
//!
//! The relay is best-effort, single-process, and in-memory: no ordering
//! across recipients, no acks, no retries, no persistence of presence.

pub mod registry;
pub mod socket;


pub use registry::{Channel, ChannelRegistry, ConnId};

use shared::dto::events::{ClientEvent, RelayedMessage, ServerEvent};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

/// The relay: a channel registry plus the event routing rules.
pub struct PresenceRelay {
    registry: ChannelRegistry,
    /// Whether typing broadcasts echo back to the originating connection.
    typing_include_sender: bool,
    /// `new message` payloads dropped for missing routing fields.
    dropped_events: AtomicU64,
}

impl PresenceRelay {
    pub fn new(typing_include_sender: bool) -> Self {
        Self {
            registry: ChannelRegistry::new(),
            typing_include_sender,
            dropped_events: AtomicU64::new(0),
        }
    }

    /// The underlying registry (exposed for inspection and tests).
    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    /// Number of `new message` events dropped for malformed payloads.
    pub fn dropped_events(&self) -> u64 {
        self.dropped_events.load(Ordering::Relaxed)
    }

    /// Route one inbound event from a connection.
    ///
    /// `tx` is the connection's outbound queue; it is registered with the
    /// relevant channel on `setup` / `join chat`.
    pub async fn handle_event(
        &self,
        conn: ConnId,
        tx: &UnboundedSender<ServerEvent>,
        event: ClientEvent,
    ) {
        match event {
            ClientEvent::Setup(identity) => {
                self.registry
                    .join(Channel::User(identity.id), conn, tx.clone())
                    .await;
                debug!(conn = %conn, user_id = identity.id, "setup: joined identity channel");

                // Acknowledge to this connection only
                if tx.send(ServerEvent::Connected).is_err() {
                    warn!(conn = %conn, "emission failed, recipient skipped");
                }
            }
            ClientEvent::JoinChat(chat_id) => {
                self.registry
                    .join(Channel::Chat(chat_id), conn, tx.clone())
                    .await;
                debug!(conn = %conn, chat_id, "joined chat channel");
            }
            ClientEvent::Typing(chat_id) => {
                self.broadcast_typing(conn, chat_id, ServerEvent::Typing(chat_id))
                    .await;
            }
            ClientEvent::StopTyping(chat_id) => {
                self.broadcast_typing(conn, chat_id, ServerEvent::StopTyping(chat_id))
                    .await;
            }
            ClientEvent::NewMessage(payload) => {
                self.route_new_message(payload).await;
            }
        }
    }

    /// Remove a closed connection from every channel.
    pub async fn disconnect(&self, conn: ConnId) {
        self.registry.leave_all(conn).await;
    }

    async fn broadcast_typing(&self, conn: ConnId, chat_id: i64, event: ServerEvent) {
        let exclude = if self.typing_include_sender {
            None
        } else {
            Some(conn)
        };

        let delivered = self
            .registry
            .broadcast(&Channel::Chat(chat_id), &event, exclude)
            .await;
        debug!(conn = %conn, chat_id, delivered, "typing broadcast");
    }

    /// Fan a `new message` payload out to every member's identity channel,
    /// excluding the sender.
    ///
    /// The payload is forwarded untouched; only `sender.id` and
    /// `chat.users[].id` are read for routing. A payload missing either is
    /// dropped: no partial delivery, no retry, no error to the sender.
    async fn route_new_message(&self, payload: serde_json::Value) {
        let routing: RelayedMessage = match serde_json::from_value(payload.clone()) {
            Ok(routing) => routing,
            Err(e) => {
                warn!(error = %e, "new message payload unreadable, event dropped");
                self.dropped_events.fetch_add(1, Ordering::Relaxed);
                return;
            }
        };

        let Some(sender_id) = routing.sender.map(|s| s.id) else {
            warn!("new message payload missing sender, event dropped");
            self.dropped_events.fetch_add(1, Ordering::Relaxed);
            return;
        };

        let Some(users) = routing.chat.and_then(|c| c.users) else {
            warn!(sender_id, "new message payload missing chat.users, event dropped");
            self.dropped_events.fetch_add(1, Ordering::Relaxed);
            return;
        };

        for user in users {
            if user.id == sender_id {
                continue;
            }

            let delivered = self
                .registry
                .broadcast(
                    &Channel::User(user.id),
                    &ServerEvent::MessageReceived(payload.clone()),
                    None,
                )
                .await;
            debug!(recipient = user.id, delivered, "message fan-out");
        }
    }
}
