//! # Shared Data Transfer Objects Library
//!
//! This library defines the wire contract between chat clients and the
//! backend API. All DTOs use JSON serialization via `serde`.
//!
//! ## Structure
//!
//! - **[`dto::chat`]**: Conversation management request bodies
//! - **[`dto::messaging`]**: Message request/response bodies
//! - **[`dto::views`]**: Enriched views returned by the API (`UserSummary`,
//!   `ChatView`, `MessageView`)
//! - **[`dto::events`]**: The presence relay's socket event contract
//!
//! ## Wire Format
//!
//! - Field names are **snake_case** (default serde behavior)
//! - Optional fields are omitted when `None` via
//!   `#[serde(skip_serializing_if = "Option::is_none")]`
//! - Socket events use a `{"event": ..., "data": ...}` envelope; event names
//!   keep their historical spelling (`"join chat"`, `"new message"`, ...)

pub mod dto;

// Re-export commonly used types for convenience
pub use dto::*;
