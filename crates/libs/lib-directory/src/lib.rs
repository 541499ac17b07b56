//! # Account Directory Client
//!
//! The account directory is an external collaborator that owns user
//! identity: credential checks, token issuance, and user records. This
//! crate only *consumes* it: verifying bearer tokens and resolving user
//! ids to display attributes for API enrichment.
//!
//! Two implementations are provided behind the [`Directory`] trait:
//!
//! - [`HttpDirectory`]: talks to a remote directory service over HTTP
//! - [`StaticDirectory`]: in-process map for local development and tests

mod http;
mod static_dir;

pub use http::HttpDirectory;
pub use static_dir::StaticDirectory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Display attributes of a user as the directory exposes them.
///
/// Credential material never leaves the directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

/// Identity of the authenticated caller, resolved from a bearer token.
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    pub user_id: i64,
    pub name: String,
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The directory could not be reached or answered unexpectedly.
    #[error("directory request failed: {0}")]
    Transport(String),

    /// The presented bearer token is missing, expired, or unknown.
    #[error("invalid bearer token")]
    InvalidToken,

    /// The directory has no record of this user id.
    #[error("unknown user: {0}")]
    UnknownUser(i64),
}

/// Client-side view of the account directory.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Resolve a bearer token to the caller it was issued to.
    async fn verify_token(&self, bearer: &str) -> Result<CallerIdentity, DirectoryError>;

    /// Resolve a single user id to its profile.
    async fn fetch_user(&self, id: i64) -> Result<UserProfile, DirectoryError>;

    /// Resolve a batch of user ids.
    ///
    /// Ids unknown to the directory are skipped rather than failing the
    /// whole batch, so a stale member reference cannot break enrichment.
    async fn fetch_users(&self, ids: &[i64]) -> Result<Vec<UserProfile>, DirectoryError>;
}

/// Shared handle used across handlers and middleware.
pub type SharedDirectory = Arc<dyn Directory>;
