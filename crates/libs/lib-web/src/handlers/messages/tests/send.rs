//! Tests for message sending (`POST /api/messages`).

use super::*;
use axum::http::StatusCode;
use shared::dto::views::{ChatView, MessageView};

#[tokio::test]
async fn sending_updates_the_latest_message_pointer() {
    let pool = setup_test_db().await;
    let app = test_app(pool.clone());
    let chat = create_direct_chat(&app).await;

    let message: MessageView = read_json(
        app.clone()
            .oneshot(authed_request(
                "POST",
                "/api/messages",
                "alice-token",
                Some(json!({"chat_id": chat.id, "content": "hello bob"})),
            ))
            .await
            .unwrap(),
    )
    .await;

    let pointer = sqlx::query_scalar::<_, Option<i64>>(
        "SELECT latest_message_id FROM chats WHERE id = ?",
    )
    .bind(chat.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(pointer, Some(message.id));

    // A second send moves the pointer along
    let second: MessageView = read_json(
        app.oneshot(authed_request(
            "POST",
            "/api/messages",
            "alice-token",
            Some(json!({"chat_id": chat.id, "content": "are you there?"})),
        ))
        .await
        .unwrap(),
    )
    .await;

    let pointer = sqlx::query_scalar::<_, Option<i64>>(
        "SELECT latest_message_id FROM chats WHERE id = ?",
    )
    .bind(chat.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(pointer, Some(second.id));
}

#[tokio::test]
async fn send_time_sender_resolution_is_partial() {
    let pool = setup_test_db().await;
    let app = test_app(pool);
    let chat = create_direct_chat(&app).await;

    let message: MessageView = read_json(
        app.oneshot(authed_request(
            "POST",
            "/api/messages",
            "alice-token",
            Some(json!({"chat_id": chat.id, "content": "hi"})),
        ))
        .await
        .unwrap(),
    )
    .await;

    // Name and avatar resolve, email does not
    assert_eq!(message.sender.id, 1);
    assert_eq!(message.sender.name, "alice");
    assert!(message.sender.avatar.is_some());
    assert!(message.sender.email.is_none());

    // The owning chat comes back with its members fully resolved
    let chat_view = message.chat.expect("sent message embeds its chat");
    assert_eq!(chat_view.id, chat.id);
    assert_eq!(chat_view.users.len(), 2);
    assert!(chat_view.users.iter().all(|u| u.email.is_some()));
}

#[tokio::test]
async fn missing_fields_are_a_bad_request() {
    let pool = setup_test_db().await;
    let app = test_app(pool);
    let chat = create_direct_chat(&app).await;

    for body in [
        json!({"content": "no chat"}),
        json!({"chat_id": chat.id}),
        json!({"chat_id": chat.id, "content": "   "}),
    ] {
        let response = app
            .clone()
            .oneshot(authed_request(
                "POST",
                "/api/messages",
                "alice-token",
                Some(body),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn sending_into_an_unknown_chat_is_not_found() {
    let pool = setup_test_db().await;
    let app = test_app(pool);

    let response = app
        .oneshot(authed_request(
            "POST",
            "/api/messages",
            "alice-token",
            Some(json!({"chat_id": 404, "content": "void"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: ErrorBody = read_json(response).await;
    assert_eq!(body.code, "NotFound");
}

#[tokio::test]
async fn overlong_content_is_rejected() {
    let pool = setup_test_db().await;
    let app = test_app(pool);
    let chat = create_direct_chat(&app).await;

    let response = app
        .oneshot(authed_request(
            "POST",
            "/api/messages",
            "alice-token",
            Some(json!({"chat_id": chat.id, "content": "x".repeat(10_001)})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listing_chats_embeds_the_latest_message_with_its_sender() {
    let pool = setup_test_db().await;
    let app = test_app(pool);
    let chat = create_direct_chat(&app).await;

    app.clone()
        .oneshot(authed_request(
            "POST",
            "/api/messages",
            "alice-token",
            Some(json!({"chat_id": chat.id, "content": "latest"})),
        ))
        .await
        .unwrap();

    let chats: Vec<ChatView> = read_json(
        app.oneshot(authed_request("GET", "/api/chats", "bob-token", None))
            .await
            .unwrap(),
    )
    .await;

    let latest = chats[0]
        .latest_message
        .as_ref()
        .expect("chat list embeds the latest message");
    assert_eq!(latest.content, "latest");
    // The embedded sender is fully resolved
    assert_eq!(latest.sender.email.as_deref(), Some("alice@example.com"));
}
