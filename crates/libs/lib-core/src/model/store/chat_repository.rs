//! # Chat Repository
//!
//! Persistence operations for conversations and their member sets.
//!
//! Direct-chat lookup treats membership as set equality: a non-group chat
//! matches `{a, b}` only when both ids are members and the member count is
//! exactly two. The lookup-then-create sequence in the web layer is not
//! atomic; two concurrent first-contact calls can create duplicate direct
//! chats (accepted race, see DESIGN.md).

use super::models::ChatRow;
use super::DbPool;
use lib_utils::time::{format_time, now_utc};
use sqlx::query_as;

pub struct ChatRepository;

impl ChatRepository {
    /// Find a chat by id
    pub async fn find_by_id(pool: &DbPool, chat_id: i64) -> Result<Option<ChatRow>, sqlx::Error> {
        query_as::<_, ChatRow>("SELECT * FROM chats WHERE id = ?")
            .bind(chat_id)
            .fetch_optional(pool)
            .await
    }

    /// Find the direct (non-group) chat whose member set is exactly `{a, b}`
    pub async fn find_direct_between(
        pool: &DbPool,
        a: i64,
        b: i64,
    ) -> Result<Option<ChatRow>, sqlx::Error> {
        query_as::<_, ChatRow>(
            r#"
            SELECT c.*
            FROM chats c
            WHERE c.is_group_chat = 0
              AND EXISTS (SELECT 1 FROM chat_members WHERE chat_id = c.id AND user_id = ?)
              AND EXISTS (SELECT 1 FROM chat_members WHERE chat_id = c.id AND user_id = ?)
              AND (SELECT COUNT(*) FROM chat_members WHERE chat_id = c.id) = 2
            LIMIT 1
            "#,
        )
        .bind(a)
        .bind(b)
        .fetch_optional(pool)
        .await
    }

    /// Create a direct chat between two users (no admin)
    pub async fn create_direct(pool: &DbPool, a: i64, b: i64) -> Result<ChatRow, sqlx::Error> {
        let now = format_time(now_utc());

        let result = sqlx::query(
            "INSERT INTO chats (name, is_group_chat, created_at, updated_at) VALUES ('direct', 0, ?, ?)",
        )
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?;

        let chat_id = result.last_insert_rowid();
        Self::insert_members(pool, chat_id, &[a, b]).await?;

        query_as::<_, ChatRow>("SELECT * FROM chats WHERE id = ?")
            .bind(chat_id)
            .fetch_one(pool)
            .await
    }

    /// Create a group chat; `admin_id` must be one of `member_ids`
    pub async fn create_group(
        pool: &DbPool,
        name: &str,
        admin_id: i64,
        member_ids: &[i64],
    ) -> Result<ChatRow, sqlx::Error> {
        let now = format_time(now_utc());

        let result = sqlx::query(
            "INSERT INTO chats (name, is_group_chat, admin_id, created_at, updated_at) VALUES (?, 1, ?, ?, ?)",
        )
        .bind(name)
        .bind(admin_id)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?;

        let chat_id = result.last_insert_rowid();
        Self::insert_members(pool, chat_id, member_ids).await?;

        query_as::<_, ChatRow>("SELECT * FROM chats WHERE id = ?")
            .bind(chat_id)
            .fetch_one(pool)
            .await
    }

    /// List all chats the user is a member of, most recently updated first
    pub async fn list_for_user(pool: &DbPool, user_id: i64) -> Result<Vec<ChatRow>, sqlx::Error> {
        query_as::<_, ChatRow>(
            r#"
            SELECT c.*
            FROM chats c
            JOIN chat_members m ON m.chat_id = c.id
            WHERE m.user_id = ?
            ORDER BY c.updated_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Member-id set of a chat
    pub async fn members_of(pool: &DbPool, chat_id: i64) -> Result<Vec<i64>, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT user_id FROM chat_members WHERE chat_id = ? ORDER BY user_id",
        )
        .bind(chat_id)
        .fetch_all(pool)
        .await
    }

    /// Rename a chat; returns `None` when the chat does not exist
    pub async fn rename(
        pool: &DbPool,
        chat_id: i64,
        name: &str,
    ) -> Result<Option<ChatRow>, sqlx::Error> {
        let result = sqlx::query("UPDATE chats SET name = ?, updated_at = ? WHERE id = ?")
            .bind(name)
            .bind(format_time(now_utc()))
            .bind(chat_id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Self::find_by_id(pool, chat_id).await
    }

    /// Add a user to the member set (idempotent); `None` when the chat does
    /// not exist
    pub async fn add_member(
        pool: &DbPool,
        chat_id: i64,
        user_id: i64,
    ) -> Result<Option<ChatRow>, sqlx::Error> {
        if Self::find_by_id(pool, chat_id).await?.is_none() {
            return Ok(None);
        }

        sqlx::query("INSERT OR IGNORE INTO chat_members (chat_id, user_id) VALUES (?, ?)")
            .bind(chat_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Self::touch(pool, chat_id).await?;
        Self::find_by_id(pool, chat_id).await
    }

    /// Remove a user from the member set; removing an absent member is a
    /// no-op, not an error. `None` when the chat does not exist.
    ///
    /// No guard against removing the admin or emptying the chat.
    pub async fn remove_member(
        pool: &DbPool,
        chat_id: i64,
        user_id: i64,
    ) -> Result<Option<ChatRow>, sqlx::Error> {
        if Self::find_by_id(pool, chat_id).await?.is_none() {
            return Ok(None);
        }

        sqlx::query("DELETE FROM chat_members WHERE chat_id = ? AND user_id = ?")
            .bind(chat_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Self::touch(pool, chat_id).await?;
        Self::find_by_id(pool, chat_id).await
    }

    /// Overwrite the latest-message pointer.
    ///
    /// Called after message persistence; not transactional with the insert.
    pub async fn set_latest_message(
        pool: &DbPool,
        chat_id: i64,
        message_id: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE chats SET latest_message_id = ?, updated_at = ? WHERE id = ?")
            .bind(message_id)
            .bind(format_time(now_utc()))
            .bind(chat_id)
            .execute(pool)
            .await?;

        Ok(())
    }

    async fn insert_members(
        pool: &DbPool,
        chat_id: i64,
        member_ids: &[i64],
    ) -> Result<(), sqlx::Error> {
        for user_id in member_ids {
            sqlx::query("INSERT OR IGNORE INTO chat_members (chat_id, user_id) VALUES (?, ?)")
                .bind(chat_id)
                .bind(user_id)
                .execute(pool)
                .await?;
        }
        Ok(())
    }

    /// Bump `updated_at` so the chat surfaces first in `list_for_user`
    async fn touch(pool: &DbPool, chat_id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE chats SET updated_at = ? WHERE id = ?")
            .bind(format_time(now_utc()))
            .bind(chat_id)
            .execute(pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_pool;
    use super::*;

    #[tokio::test]
    async fn direct_chat_lookup_is_idempotent() {
        let pool = test_pool().await;

        assert!(ChatRepository::find_direct_between(&pool, 1, 2)
            .await
            .unwrap()
            .is_none());

        let created = ChatRepository::create_direct(&pool, 1, 2).await.unwrap();
        let found = ChatRepository::find_direct_between(&pool, 1, 2)
            .await
            .unwrap()
            .expect("direct chat should be found after creation");

        assert_eq!(created.id, found.id);
        // Order of the pair does not matter
        let found_reversed = ChatRepository::find_direct_between(&pool, 2, 1)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created.id, found_reversed.id);
    }

    #[tokio::test]
    async fn direct_lookup_rejects_superset_matches() {
        let pool = test_pool().await;

        // A three-member chat containing both users must not match even if
        // its group flag is unset.
        let result = sqlx::query(
            "INSERT INTO chats (name, is_group_chat, created_at, updated_at) VALUES ('direct', 0, '2026-01-01T00:00:00+00:00', '2026-01-01T00:00:00+00:00')",
        )
        .execute(&pool)
        .await
        .unwrap();
        let chat_id = result.last_insert_rowid();
        for user in [1_i64, 2, 3] {
            sqlx::query("INSERT INTO chat_members (chat_id, user_id) VALUES (?, ?)")
                .bind(chat_id)
                .bind(user)
                .execute(&pool)
                .await
                .unwrap();
        }

        assert!(ChatRepository::find_direct_between(&pool, 1, 2)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn removing_an_absent_member_is_a_noop() {
        let pool = test_pool().await;
        let chat = ChatRepository::create_group(&pool, "team", 1, &[1, 2, 3])
            .await
            .unwrap();

        let updated = ChatRepository::remove_member(&pool, chat.id, 99)
            .await
            .unwrap()
            .expect("chat still exists");

        assert_eq!(updated.id, chat.id);
        assert_eq!(
            ChatRepository::members_of(&pool, chat.id).await.unwrap(),
            vec![1, 2, 3]
        );
    }

    #[tokio::test]
    async fn member_mutations_are_permissive() {
        let pool = test_pool().await;
        let chat = ChatRepository::create_group(&pool, "team", 1, &[1, 2, 3])
            .await
            .unwrap();

        // Removing the admin is allowed
        ChatRepository::remove_member(&pool, chat.id, 1)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            ChatRepository::members_of(&pool, chat.id).await.unwrap(),
            vec![2, 3]
        );

        // Duplicate add is idempotent
        ChatRepository::add_member(&pool, chat.id, 2)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            ChatRepository::members_of(&pool, chat.id).await.unwrap(),
            vec![2, 3]
        );
    }

    #[tokio::test]
    async fn mutations_on_unknown_chat_return_none() {
        let pool = test_pool().await;

        assert!(ChatRepository::rename(&pool, 404, "ghost")
            .await
            .unwrap()
            .is_none());
        assert!(ChatRepository::add_member(&pool, 404, 1)
            .await
            .unwrap()
            .is_none());
        assert!(ChatRepository::remove_member(&pool, 404, 1)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn list_orders_by_most_recent_update() {
        let pool = test_pool().await;
        let first = ChatRepository::create_direct(&pool, 1, 2).await.unwrap();
        let second = ChatRepository::create_direct(&pool, 1, 3).await.unwrap();

        // Touch the older chat; it should surface first
        ChatRepository::rename(&pool, first.id, "renamed")
            .await
            .unwrap();

        let chats = ChatRepository::list_for_user(&pool, 1).await.unwrap();
        assert_eq!(
            chats.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![first.id, second.id]
        );
        // User 3 only sees their own chat
        let chats = ChatRepository::list_for_user(&pool, 3).await.unwrap();
        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].id, second.id);
    }
}
