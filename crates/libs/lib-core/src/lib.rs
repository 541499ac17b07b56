//! # Core Library
//!
//! Configuration, error taxonomy, and the conversation store (chats and
//! messages over SQLite). User records are owned by the external account
//! directory and referenced by id only.

pub mod config;
pub mod error;
pub mod model;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
pub use model::store::{create_pool, DbPool};
