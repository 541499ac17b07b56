//! # Conversation Handlers
//!
//! HTTP endpoints for conversation management.
//!
//! ## Endpoints
//!
//! - `GET  /api/chats` - List the caller's chats, most recent first
//! - `POST /api/chats` - Open (or create) a direct chat with another user
//! - `POST /api/chats/group` - Create a group chat
//! - `PUT  /api/chats/rename` - Rename a chat
//! - `PUT  /api/chats/members/add` - Add a member
//! - `PUT  /api/chats/members/remove` - Remove a member

#[cfg(test)]
mod tests;

use crate::services::Resolver;
use axum::{extract::State, Extension, Json};
use lib_core::model::store::ChatRepository;
use lib_core::{AppError, DbPool};
use lib_directory::{CallerIdentity, SharedDirectory};
use lib_utils::validation::{validate_min_members, validate_not_empty};
use shared::dto::chat::{
    AccessChatRequest, CreateGroupChatRequest, MemberUpdateRequest, RenameChatRequest,
};
use shared::dto::views::ChatView;
use tracing::{debug, info};

/// List all chats the caller is a member of, enriched with members, admin,
/// and latest message, most recently updated first.
pub async fn list_chats(
    State(db): State<DbPool>,
    State(directory): State<SharedDirectory>,
    Extension(caller): Extension<CallerIdentity>,
) -> Result<Json<Vec<ChatView>>, AppError> {
    let chats = ChatRepository::list_for_user(&db, caller.user_id).await?;

    let resolver = Resolver::new(&db, directory.as_ref());
    let mut views = Vec::with_capacity(chats.len());
    for chat in &chats {
        views.push(resolver.chat_full(chat).await?);
    }

    Ok(Json(views))
}

/// Open the direct chat with another user, creating it on first contact.
///
/// Lookup-then-create is not atomic; two concurrent first contacts between
/// the same pair can create duplicate direct chats (accepted race).
pub async fn access_chat(
    State(db): State<DbPool>,
    State(directory): State<SharedDirectory>,
    Extension(caller): Extension<CallerIdentity>,
    Json(payload): Json<AccessChatRequest>,
) -> Result<Json<ChatView>, AppError> {
    let other = payload.user_id.ok_or_else(|| {
        debug!("user_id param not sent with request");
        AppError::InvalidRequest("user_id param not sent with request".to_string())
    })?;

    let resolver = Resolver::new(&db, directory.as_ref());

    if let Some(chat) = ChatRepository::find_direct_between(&db, caller.user_id, other).await? {
        return Ok(Json(resolver.chat_full(&chat).await?));
    }

    let chat = ChatRepository::create_direct(&db, caller.user_id, other).await?;
    info!(chat_id = chat.id, "created direct chat");

    Ok(Json(resolver.chat_with_members(&chat).await?))
}

/// Create a group chat. The caller is added to the member set and becomes
/// the group admin.
pub async fn create_group_chat(
    State(db): State<DbPool>,
    State(directory): State<SharedDirectory>,
    Extension(caller): Extension<CallerIdentity>,
    Json(payload): Json<CreateGroupChatRequest>,
) -> Result<Json<ChatView>, AppError> {
    validate_not_empty(&payload.name, "name").map_err(AppError::InvalidRequest)?;
    validate_min_members(payload.user_ids.len(), 2).map_err(AppError::InvalidRequest)?;

    let mut member_ids = payload.user_ids.clone();
    member_ids.push(caller.user_id);

    let chat = ChatRepository::create_group(&db, &payload.name, caller.user_id, &member_ids).await?;
    info!(chat_id = chat.id, members = member_ids.len(), "created group chat");

    let resolver = Resolver::new(&db, directory.as_ref());
    Ok(Json(resolver.chat_with_members(&chat).await?))
}

/// Rename a chat.
pub async fn rename_chat(
    State(db): State<DbPool>,
    State(directory): State<SharedDirectory>,
    Json(payload): Json<RenameChatRequest>,
) -> Result<Json<ChatView>, AppError> {
    let chat = ChatRepository::rename(&db, payload.chat_id, &payload.name)
        .await?
        .ok_or_else(|| AppError::NotFound("Chat not found".to_string()))?;

    let resolver = Resolver::new(&db, directory.as_ref());
    Ok(Json(resolver.chat_with_members(&chat).await?))
}

/// Add a user to a chat's member set.
pub async fn add_member(
    State(db): State<DbPool>,
    State(directory): State<SharedDirectory>,
    Json(payload): Json<MemberUpdateRequest>,
) -> Result<Json<ChatView>, AppError> {
    let chat = ChatRepository::add_member(&db, payload.chat_id, payload.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Chat not found".to_string()))?;

    let resolver = Resolver::new(&db, directory.as_ref());
    Ok(Json(resolver.chat_with_members(&chat).await?))
}

/// Remove a user from a chat's member set. Removing an absent member is a
/// no-op that still returns the (unchanged) chat.
pub async fn remove_member(
    State(db): State<DbPool>,
    State(directory): State<SharedDirectory>,
    Json(payload): Json<MemberUpdateRequest>,
) -> Result<Json<ChatView>, AppError> {
    let chat = ChatRepository::remove_member(&db, payload.chat_id, payload.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Chat not found".to_string()))?;

    let resolver = Resolver::new(&db, directory.as_ref());
    Ok(Json(resolver.chat_with_members(&chat).await?))
}
