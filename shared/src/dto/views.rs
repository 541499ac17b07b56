//! # Enriched Views
//!
//! Materialized API views in which stored reference ids have been resolved
//! to display attributes. Credential material never appears here.
//!
//! A [`ChatView`] may embed its latest [`MessageView`] and a [`MessageView`]
//! may embed its owning [`ChatView`]; each embedding stops there (the
//! embedded side leaves its own back-reference `None`), so the structure is
//! finite.

use serde::{Deserialize, Serialize};

/// Display attributes of a user, resolved from the account directory.
///
/// `email` is `None` in contexts that resolve the sender partially
/// (message send), and populated when listing messages or chat members.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A conversation with its references resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatView {
    pub id: i64,
    pub name: String,
    pub is_group_chat: bool,
    /// Resolved member set; field name is part of the relay contract
    /// (`new message` routing reads `chat.users`).
    pub users: Vec<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_admin: Option<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_message: Option<Box<MessageView>>,
    pub created_at: String,
    pub updated_at: String,
}

/// A message with its sender (and, where requested, its owning chat) resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageView {
    pub id: i64,
    pub sender: UserSummary,
    pub content: String,
    pub chat_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat: Option<Box<ChatView>>,
    pub created_at: String,
}
