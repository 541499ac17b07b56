//! # Enrichment Service
//!
//! Turns stored rows into API views by resolving reference ids through the
//! account directory: chat members, group admin, latest message, and
//! message senders. Resolution is an explicit per-entity step; composite
//! views (chat → latest message → sender) are built by composing them.
//!
//! Resolution depth is part of the contract:
//!
//! - chat members, admins, and listed-message senders resolve **fully**
//!   (name, avatar, email)
//! - the sender of a just-sent message resolves **partially**
//!   (name and avatar, no email)
//! - a latest-message pointer whose message or sender no longer resolves
//!   yields "no latest message" rather than an error

use lib_core::model::store::models::{ChatRow, MessageRow};
use lib_core::model::store::{ChatRepository, MessageRepository};
use lib_core::{AppError, DbPool};
use lib_directory::{Directory, DirectoryError, UserProfile};
use shared::dto::views::{ChatView, MessageView, UserSummary};
use std::collections::HashMap;
use tracing::debug;

/// Map a directory failure onto the application taxonomy.
fn directory_error(e: DirectoryError) -> AppError {
    match e {
        DirectoryError::InvalidToken => AppError::Unauthorized("Invalid token".to_string()),
        DirectoryError::UnknownUser(id) => AppError::NotFound(format!("User {} not found", id)),
        DirectoryError::Transport(msg) => AppError::Directory(msg),
    }
}

/// Full resolution: display attributes including email.
fn full(profile: &UserProfile) -> UserSummary {
    UserSummary {
        id: profile.id,
        name: profile.name.clone(),
        avatar: profile.avatar.clone(),
        email: Some(profile.email.clone()),
    }
}

/// Partial resolution used at message-send time: no email.
fn brief(profile: &UserProfile) -> UserSummary {
    UserSummary {
        id: profile.id,
        name: profile.name.clone(),
        avatar: profile.avatar.clone(),
        email: None,
    }
}

/// Resolver over the conversation store and the account directory.
pub struct Resolver<'a> {
    db: &'a DbPool,
    directory: &'a dyn Directory,
}

impl<'a> Resolver<'a> {
    pub fn new(db: &'a DbPool, directory: &'a dyn Directory) -> Self {
        Self { db, directory }
    }

    /// Batch-resolve profiles into an id-keyed map.
    async fn profiles(&self, ids: &[i64]) -> Result<HashMap<i64, UserProfile>, AppError> {
        let mut ids: Vec<i64> = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let profiles = self
            .directory
            .fetch_users(&ids)
            .await
            .map_err(directory_error)?;

        Ok(profiles.into_iter().map(|p| (p.id, p)).collect())
    }

    /// Resolve a chat with its members and admin. No latest message.
    pub async fn chat_with_members(&self, chat: &ChatRow) -> Result<ChatView, AppError> {
        let member_ids = ChatRepository::members_of(self.db, chat.id).await?;

        let mut lookup_ids = member_ids.clone();
        if let Some(admin_id) = chat.admin_id {
            lookup_ids.push(admin_id);
        }
        let profiles = self.profiles(&lookup_ids).await?;

        let users = member_ids
            .iter()
            .filter_map(|id| profiles.get(id).map(full))
            .collect();
        let group_admin = chat.admin_id.and_then(|id| profiles.get(&id).map(full));

        Ok(ChatView {
            id: chat.id,
            name: chat.name.clone(),
            is_group_chat: chat.is_group_chat,
            users,
            group_admin,
            latest_message: None,
            created_at: chat.created_at.clone(),
            updated_at: chat.updated_at.clone(),
        })
    }

    /// Resolve a chat with members, admin, and its latest message (whose
    /// sender is resolved fully).
    pub async fn chat_full(&self, chat: &ChatRow) -> Result<ChatView, AppError> {
        let mut view = self.chat_with_members(chat).await?;
        view.latest_message = self.latest_message_of(chat).await?;
        Ok(view)
    }

    /// Resolve the latest-message pointer of a chat, if it still resolves.
    ///
    /// The pointer may dangle after a delete; that is reported as `None`,
    /// never as an error.
    async fn latest_message_of(
        &self,
        chat: &ChatRow,
    ) -> Result<Option<Box<MessageView>>, AppError> {
        let Some(message_id) = chat.latest_message_id else {
            return Ok(None);
        };

        let Some(message) = MessageRepository::find_by_id(self.db, message_id).await? else {
            debug!(
                chat_id = chat.id,
                message_id, "latest-message pointer dangles; resolving to none"
            );
            return Ok(None);
        };

        let profiles = self.profiles(&[message.sender_id]).await?;
        let Some(sender) = profiles.get(&message.sender_id).map(full) else {
            debug!(
                chat_id = chat.id,
                sender_id = message.sender_id,
                "latest-message sender unknown to directory; resolving to none"
            );
            return Ok(None);
        };

        Ok(Some(Box::new(MessageView {
            id: message.id,
            sender,
            content: message.content,
            chat_id: message.chat_id,
            chat: None,
            created_at: message.created_at,
        })))
    }

    /// Resolve a batch of listed messages: every sender fully resolved,
    /// the shared owning chat resolved with its members.
    pub async fn messages_listed(
        &self,
        chat: &ChatRow,
        messages: &[MessageRow],
    ) -> Result<Vec<MessageView>, AppError> {
        let chat_view = Box::new(self.chat_with_members(chat).await?);

        let sender_ids: Vec<i64> = messages.iter().map(|m| m.sender_id).collect();
        let profiles = self.profiles(&sender_ids).await?;

        let mut views = Vec::with_capacity(messages.len());
        for message in messages {
            let profile = profiles
                .get(&message.sender_id)
                .ok_or_else(|| AppError::NotFound(format!("User {} not found", message.sender_id)))?;

            views.push(MessageView {
                id: message.id,
                sender: full(profile),
                content: message.content.clone(),
                chat_id: message.chat_id,
                chat: Some(chat_view.clone()),
                created_at: message.created_at.clone(),
            });
        }

        Ok(views)
    }

    /// Resolve a just-sent message: sender partially resolved (name and
    /// avatar only), owning chat resolved with its members.
    pub async fn message_sent(
        &self,
        chat: &ChatRow,
        message: &MessageRow,
    ) -> Result<MessageView, AppError> {
        let chat_view = self.chat_with_members(chat).await?;

        let profile = self
            .directory
            .fetch_user(message.sender_id)
            .await
            .map_err(directory_error)?;

        Ok(MessageView {
            id: message.id,
            sender: brief(&profile),
            content: message.content.clone(),
            chat_id: message.chat_id,
            chat: Some(Box::new(chat_view)),
            created_at: message.created_at.clone(),
        })
    }
}
