//! # Conversation Data Transfer Objects
//!
//! Request structures for conversation management endpoints.

use serde::{Deserialize, Serialize};

/// Open (or create) a direct chat with another user
///
/// `user_id` is optional on the wire so a missing field surfaces as a 400
/// with a descriptive message instead of a deserialization error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessChatRequest {
    pub user_id: Option<i64>,
}

/// Create a group chat; the caller is added and becomes admin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroupChatRequest {
    pub name: String,
    pub user_ids: Vec<i64>,
}

/// Rename a chat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameChatRequest {
    pub chat_id: i64,
    pub name: String,
}

/// Add or remove a member of a chat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberUpdateRequest {
    pub chat_id: i64,
    pub user_id: i64,
}
