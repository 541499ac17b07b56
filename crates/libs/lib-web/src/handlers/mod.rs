//! # HTTP Handlers
//!
//! REST endpoints for conversations and messages. All routes here sit
//! behind the auth middleware and extract the caller from request
//! extensions.

pub mod chats;
pub mod messages;
