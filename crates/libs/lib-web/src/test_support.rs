//! Shared fixtures for handler tests: an in-memory database with the chat
//! schema, a static account directory, and a fully-wired router.

use crate::relay::PresenceRelay;
use crate::server::{create_router, AppState};
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use lib_core::config::{Config, DirectoryMode};
use lib_core::DbPool;
use lib_directory::{SharedDirectory, StaticDirectory, UserProfile};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;

/// Setup test database with schema
pub async fn setup_test_db() -> DbPool {
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

/// Create test config
pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        directory_mode: DirectoryMode::Static,
        directory_url: None,
        typing_include_sender: false,
    }
}

fn profile(id: i64, name: &str) -> UserProfile {
    UserProfile {
        id,
        name: name.to_string(),
        email: format!("{}@example.com", name),
        avatar: Some(format!("https://avatars.example.com/{}.png", name)),
        is_admin: false,
    }
}

/// Directory with four known users; alice and bob hold bearer tokens.
pub fn test_directory() -> SharedDirectory {
    Arc::new(
        StaticDirectory::new()
            .with_user(profile(1, "alice"))
            .with_user(profile(2, "bob"))
            .with_user(profile(3, "carol"))
            .with_user(profile(4, "dave"))
            .with_token("alice-token", 1)
            .with_token("bob-token", 2),
    )
}

/// Create test app with the full router, middleware included
pub fn test_app(pool: DbPool) -> axum::Router {
    let state = AppState {
        db: pool,
        config: test_config(),
        directory: test_directory(),
        relay: Arc::new(PresenceRelay::new(false)),
    };

    create_router(state)
}

/// Build a JSON request carrying a bearer token.
pub fn authed_request(
    method: &str,
    uri: &str,
    token: &str,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token));

    let body = match body {
        Some(value) => Body::from(serde_json::to_string(&value).unwrap()),
        None => Body::empty(),
    };

    builder.body(body).unwrap()
}

/// Error body shape produced by `AppError::into_response`.
#[derive(Debug, serde::Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
}

/// Deserialize a response body.
pub async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
