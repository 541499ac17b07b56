//! # Channel Registry
//!
//! Connection-to-channel membership for the presence relay. Channels are
//! typed: a private identity channel per user (joined at `setup`) and a
//! channel per chat (joined on demand to scope typing indicators).
//!
//! Membership is per **connection**, not per identity: the same user may
//! hold several connections and the same chat channel may hold connections
//! of many users. The registry is owned by the relay and mutated only
//! through it, which keeps fan-out testable without any transport.

use shared::dto::events::ServerEvent;
use std::collections::HashMap;
use tokio::sync::{mpsc::UnboundedSender, RwLock};
use tracing::warn;
use uuid::Uuid;

/// Identifier of a live connection.
pub type ConnId = Uuid;

/// A named broadcast group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Private identity channel, used for targeted `message received`
    /// delivery independent of which chats the user is viewing.
    User(i64),
    /// Chat channel, scoping ephemeral typing indicators to the
    /// connections currently viewing that chat.
    Chat(i64),
}

/// Concurrent connection-to-channel membership registry.
#[derive(Default)]
pub struct ChannelRegistry {
    channels: RwLock<HashMap<Channel, HashMap<ConnId, UnboundedSender<ServerEvent>>>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join a connection to a channel. Re-joining replaces the sender.
    pub async fn join(&self, channel: Channel, conn: ConnId, tx: UnboundedSender<ServerEvent>) {
        self.channels
            .write()
            .await
            .entry(channel)
            .or_default()
            .insert(conn, tx);
    }

    /// Remove a connection from every channel it joined.
    ///
    /// Called by the socket task when the transport closes; empty channels
    /// are dropped.
    pub async fn leave_all(&self, conn: ConnId) {
        let mut channels = self.channels.write().await;
        channels.retain(|_, members| {
            members.remove(&conn);
            !members.is_empty()
        });
    }

    /// Emit an event to every connection in a channel, optionally excluding
    /// one connection (the originator).
    ///
    /// Fire-and-forget: a failed emission to one recipient is logged and
    /// never aborts delivery to the rest. Returns the number of successful
    /// emissions.
    pub async fn broadcast(
        &self,
        channel: &Channel,
        event: &ServerEvent,
        exclude: Option<ConnId>,
    ) -> usize {
        let channels = self.channels.read().await;
        let Some(members) = channels.get(channel) else {
            return 0;
        };

        let mut delivered = 0;
        for (conn, tx) in members {
            if Some(*conn) == exclude {
                continue;
            }
            match tx.send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(_) => {
                    // Receiver already gone; the socket task prunes it
                    warn!(channel = ?channel, conn = %conn, "emission failed, recipient skipped");
                }
            }
        }

        delivered
    }

    /// Number of connections currently in a channel.
    pub async fn connections_in(&self, channel: &Channel) -> usize {
        self.channels
            .read()
            .await
            .get(channel)
            .map(|members| members.len())
            .unwrap_or(0)
    }
}
