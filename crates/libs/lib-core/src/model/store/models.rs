//! # Row Models
//!
//! Raw database rows. Enrichment into API views happens in the web layer,
//! where member/admin/sender ids are resolved through the account directory.

use serde::Serialize;
use sqlx::FromRow;

/// A conversation row; the member set lives in `chat_members`.
#[derive(Debug, Clone, FromRow)]
pub struct ChatRow {
    pub id: i64,
    pub name: String,
    pub is_group_chat: bool,
    pub admin_id: Option<i64>,
    /// May dangle after the referenced message is deleted.
    pub latest_message_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

/// A message row. Serialized as-is by the edit endpoint, which returns the
/// raw record rather than an enriched view.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MessageRow {
    pub id: i64,
    pub chat_id: i64,
    pub sender_id: i64,
    pub content: String,
    pub created_at: String,
}
