//! # Messaging Data Transfer Objects
//!
//! Request and response structures for message endpoints.

use serde::{Deserialize, Serialize};

/// Send a new message into a chat
///
/// Both fields are optional on the wire; the handler rejects missing or
/// empty values with a 400 rather than a deserialization error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub chat_id: Option<i64>,
    pub content: Option<String>,
}

/// Replace the content of an existing message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditMessageRequest {
    pub content: String,
}

/// Confirmation returned after deleting a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteMessageResponse {
    pub message: String,
}
