//! # Message Handler Tests
//!
//! Test suite for message endpoints, driven through the full router
//! (auth middleware included) against an in-memory database.

mod send;

pub(crate) use crate::test_support::{
    authed_request, read_json, setup_test_db, test_app, ErrorBody,
};

use serde_json::json;
use shared::dto::views::ChatView;
use tower::ServiceExt;

/// Direct chat between alice (1) and bob (2).
pub(crate) async fn create_direct_chat(app: &axum::Router) -> ChatView {
    read_json(
        app.clone()
            .oneshot(authed_request(
                "POST",
                "/api/chats",
                "alice-token",
                Some(json!({"user_id": 2})),
            ))
            .await
            .unwrap(),
    )
    .await
}
