//! Tests for group-chat creation (`POST /api/chats/group`).

use super::*;
use axum::http::StatusCode;
use serde_json::json;
use shared::dto::views::ChatView;
use tower::ServiceExt;

#[tokio::test]
async fn group_creation_adds_caller_as_admin() {
    let pool = setup_test_db().await;
    let app = test_app(pool);

    let response = app
        .oneshot(authed_request(
            "POST",
            "/api/chats/group",
            "alice-token",
            Some(json!({"name": "weekend plans", "user_ids": [2, 3]})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let chat: ChatView = read_json(response).await;
    assert!(chat.is_group_chat);
    assert_eq!(chat.name, "weekend plans");

    // Caller is auto-added, three members total
    let mut member_ids: Vec<i64> = chat.users.iter().map(|u| u.id).collect();
    member_ids.sort_unstable();
    assert_eq!(member_ids, vec![1, 2, 3]);

    // Caller became admin, and the admin is one of the members
    let admin = chat.group_admin.expect("group chat has an admin");
    assert_eq!(admin.id, 1);
    assert!(member_ids.contains(&admin.id));
}

#[tokio::test]
async fn too_few_members_is_a_bad_request() {
    let pool = setup_test_db().await;
    let app = test_app(pool);

    let response = app
        .oneshot(authed_request(
            "POST",
            "/api/chats/group",
            "alice-token",
            Some(json!({"name": "pair", "user_ids": [2]})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = read_json(response).await;
    assert_eq!(body.code, "InvalidRequest");
}

#[tokio::test]
async fn empty_name_is_a_bad_request() {
    let pool = setup_test_db().await;
    let app = test_app(pool);

    let response = app
        .oneshot(authed_request(
            "POST",
            "/api/chats/group",
            "alice-token",
            Some(json!({"name": "   ", "user_ids": [2, 3]})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn members_resolve_with_display_attributes() {
    let pool = setup_test_db().await;
    let app = test_app(pool);

    let chat: ChatView = read_json(
        app.oneshot(authed_request(
            "POST",
            "/api/chats/group",
            "alice-token",
            Some(json!({"name": "team", "user_ids": [2, 3]})),
        ))
        .await
        .unwrap(),
    )
    .await;

    let bob = chat.users.iter().find(|u| u.id == 2).unwrap();
    assert_eq!(bob.name, "bob");
    assert_eq!(bob.email.as_deref(), Some("bob@example.com"));
    assert!(bob.avatar.is_some());
}
