//! # Message Repository
//!
//! Persistence operations for messages. Deleting a message deliberately
//! leaves the owning chat's latest-message pointer untouched; enrichment
//! resolves a dangling pointer to "no latest message".

use super::models::MessageRow;
use super::DbPool;
use lib_utils::time::{format_time, now_utc};
use sqlx::query_as;

pub struct MessageRepository;

impl MessageRepository {
    /// Persist a new message
    pub async fn create(
        pool: &DbPool,
        chat_id: i64,
        sender_id: i64,
        content: &str,
    ) -> Result<MessageRow, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO messages (chat_id, sender_id, content, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(chat_id)
        .bind(sender_id)
        .bind(content)
        .bind(format_time(now_utc()))
        .execute(pool)
        .await?;

        let id = result.last_insert_rowid();

        query_as::<_, MessageRow>("SELECT * FROM messages WHERE id = ?")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Find a message by id
    pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<MessageRow>, sqlx::Error> {
        query_as::<_, MessageRow>("SELECT * FROM messages WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All messages of a chat in creation order
    pub async fn list_for_chat(pool: &DbPool, chat_id: i64) -> Result<Vec<MessageRow>, sqlx::Error> {
        query_as::<_, MessageRow>("SELECT * FROM messages WHERE chat_id = ? ORDER BY id ASC")
            .bind(chat_id)
            .fetch_all(pool)
            .await
    }

    /// Replace a message's content; `None` when the message does not exist
    pub async fn update_content(
        pool: &DbPool,
        id: i64,
        content: &str,
    ) -> Result<Option<MessageRow>, sqlx::Error> {
        let result = sqlx::query("UPDATE messages SET content = ? WHERE id = ?")
            .bind(content)
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Self::find_by_id(pool, id).await
    }

    /// Delete a message; returns whether a row was removed.
    ///
    /// The owning chat's latest-message pointer is NOT recomputed.
    pub async fn delete(pool: &DbPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM messages WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
