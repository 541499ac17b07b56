//! # Database Store
//!
//! Database connection pool and repository implementations for the two
//! owned collections: chats (with their member-id sets) and messages.

// region: --- Modules
pub mod chat_repository;
pub mod message_repository;
pub mod models;
// endregion: --- Modules

// region: --- Re-exports
pub use chat_repository::ChatRepository;
pub use message_repository::MessageRepository;
// endregion: --- Re-exports

// region: --- Types and Functions
use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};
use std::env;

/// Type alias for SQLite connection pool.
pub type DbPool = SqlitePool;

/// Create a new SQLite connection pool.
pub async fn create_pool() -> anyhow::Result<DbPool> {
    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:data/chat.db".to_string());

    let options = database_url
        .parse::<SqliteConnectOptions>()?
        .create_if_missing(true);

    let pool = SqlitePool::connect_with(options).await?;

    Ok(pool)
}
// endregion: --- Types and Functions

/// In-memory pool with the chat schema applied, shared by repository tests.
#[cfg(test)]
pub(crate) async fn test_pool() -> DbPool {
    use sqlx::sqlite::SqlitePoolOptions;

    let pool = SqlitePoolOptions::new()
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    sqlx::query(
        r#"
        CREATE TABLE chats (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            is_group_chat BOOLEAN NOT NULL DEFAULT 0,
            admin_id INTEGER,
            latest_message_id INTEGER,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(&pool)
    .await
    .expect("Failed to create chats table");

    sqlx::query(
        r#"
        CREATE TABLE chat_members (
            chat_id INTEGER NOT NULL REFERENCES chats(id) ON DELETE CASCADE,
            user_id INTEGER NOT NULL,
            PRIMARY KEY (chat_id, user_id)
        )
        "#,
    )
    .execute(&pool)
    .await
    .expect("Failed to create chat_members table");

    sqlx::query(
        r#"
        CREATE TABLE messages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            chat_id INTEGER NOT NULL REFERENCES chats(id) ON DELETE CASCADE,
            sender_id INTEGER NOT NULL,
            content TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(&pool)
    .await
    .expect("Failed to create messages table");

    pool
}
