//! # Message Handlers
//!
//! HTTP endpoints for message persistence.
//!
//! ## Endpoints
//!
//! - `GET    /api/messages/{chat_id}` - All messages of a chat, in creation order
//! - `POST   /api/messages` - Send a new message
//! - `PUT    /api/messages/{id}` - Edit a message's content
//! - `DELETE /api/messages/{id}` - Delete a message
//!
//! Sending persists the message, points the owning chat's latest-message
//! reference at it, and returns the enriched record; the client then
//! re-publishes that record onto the relay socket for fan-out. Deleting
//! never recomputes the latest-message pointer.

#[cfg(test)]
mod tests;

use crate::services::Resolver;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use lib_core::model::store::models::MessageRow;
use lib_core::model::store::{ChatRepository, MessageRepository};
use lib_core::{AppError, DbPool};
use lib_directory::{CallerIdentity, SharedDirectory};
use lib_utils::validation::{validate_max_length, validate_not_empty};
use shared::dto::messaging::{DeleteMessageResponse, EditMessageRequest, SendMessageRequest};
use shared::dto::views::MessageView;
use tracing::{debug, info};

const MAX_MESSAGE_LENGTH: usize = 10_000;

/// List all messages of a chat in creation order.
///
/// An unknown chat id yields an empty list, not a 404.
pub async fn list_messages(
    State(db): State<DbPool>,
    State(directory): State<SharedDirectory>,
    Path(chat_id): Path<i64>,
) -> Result<Json<Vec<MessageView>>, AppError> {
    let messages = MessageRepository::list_for_chat(&db, chat_id).await?;
    if messages.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let chat = ChatRepository::find_by_id(&db, chat_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Chat not found".to_string()))?;

    let resolver = Resolver::new(&db, directory.as_ref());
    Ok(Json(resolver.messages_listed(&chat, &messages).await?))
}

/// Persist a new message and return it enriched.
pub async fn send_message(
    State(db): State<DbPool>,
    State(directory): State<SharedDirectory>,
    Extension(caller): Extension<CallerIdentity>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<Json<MessageView>, AppError> {
    let (chat_id, content) = match (payload.chat_id, payload.content) {
        (Some(chat_id), Some(content)) => (chat_id, content),
        _ => {
            debug!("invalid data passed into request");
            return Err(AppError::InvalidRequest(
                "chat_id and content are required".to_string(),
            ));
        }
    };
    validate_not_empty(&content, "content").map_err(AppError::InvalidRequest)?;
    validate_max_length(&content, MAX_MESSAGE_LENGTH, "content").map_err(AppError::InvalidRequest)?;

    let chat = ChatRepository::find_by_id(&db, chat_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Chat not found".to_string()))?;

    let message = MessageRepository::create(&db, chat.id, caller.user_id, &content).await?;

    let resolver = Resolver::new(&db, directory.as_ref());
    let view = resolver.message_sent(&chat, &message).await?;

    // Best-effort pointer update after persistence, not transactional
    ChatRepository::set_latest_message(&db, chat.id, message.id).await?;

    info!(message_id = message.id, chat_id = chat.id, "message sent");

    Ok(Json(view))
}

/// Replace the content of an existing message.
///
/// Returns the raw updated record; enrichment is reserved for the list and
/// send paths.
pub async fn edit_message(
    State(db): State<DbPool>,
    Path(id): Path<i64>,
    Json(payload): Json<EditMessageRequest>,
) -> Result<Json<MessageRow>, AppError> {
    let message = MessageRepository::update_content(&db, id, &payload.content)
        .await?
        .ok_or_else(|| AppError::NotFound("Message not found".to_string()))?;

    Ok(Json(message))
}

/// Delete a message.
///
/// The owning chat's latest-message pointer is left untouched, even when it
/// references the deleted id; enrichment resolves such a dangling pointer
/// to "no latest message".
pub async fn delete_message(
    State(db): State<DbPool>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteMessageResponse>, AppError> {
    let removed = MessageRepository::delete(&db, id).await?;
    if !removed {
        return Err(AppError::NotFound("Message not found".to_string()));
    }

    info!(message_id = id, "message deleted");

    Ok(Json(DeleteMessageResponse {
        message: "Message deleted successfully".to_string(),
    }))
}
