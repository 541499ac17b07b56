//! # Static Directory
//!
//! In-process directory for local development and tests: a fixed set of
//! users and bearer tokens, seeded at construction or through the builder
//! methods.

use crate::{CallerIdentity, Directory, DirectoryError, UserProfile};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// Directory backed by in-memory maps.
#[derive(Default)]
pub struct StaticDirectory {
    users: RwLock<HashMap<i64, UserProfile>>,
    tokens: RwLock<HashMap<String, i64>>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user profile.
    pub fn with_user(self, profile: UserProfile) -> Self {
        self.users.write().unwrap().insert(profile.id, profile);
        self
    }

    /// Register a bearer token for an already-registered user.
    pub fn with_token(self, token: impl Into<String>, user_id: i64) -> Self {
        self.tokens.write().unwrap().insert(token.into(), user_id);
        self
    }
}

#[async_trait]
impl Directory for StaticDirectory {
    async fn verify_token(&self, bearer: &str) -> Result<CallerIdentity, DirectoryError> {
        let user_id = *self
            .tokens
            .read()
            .unwrap()
            .get(bearer)
            .ok_or(DirectoryError::InvalidToken)?;

        let users = self.users.read().unwrap();
        let profile = users.get(&user_id).ok_or(DirectoryError::InvalidToken)?;

        Ok(CallerIdentity {
            user_id,
            name: profile.name.clone(),
        })
    }

    async fn fetch_user(&self, id: i64) -> Result<UserProfile, DirectoryError> {
        self.users
            .read()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(DirectoryError::UnknownUser(id))
    }

    async fn fetch_users(&self, ids: &[i64]) -> Result<Vec<UserProfile>, DirectoryError> {
        let users = self.users.read().unwrap();
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: i64, name: &str) -> UserProfile {
        UserProfile {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name),
            avatar: None,
            is_admin: false,
        }
    }

    #[tokio::test]
    async fn token_verification() {
        let dir = StaticDirectory::new()
            .with_user(sample(1, "alice"))
            .with_token("alice-token", 1);

        let caller = dir.verify_token("alice-token").await.unwrap();
        assert_eq!(caller.user_id, 1);
        assert_eq!(caller.name, "alice");

        assert!(matches!(
            dir.verify_token("bogus").await,
            Err(DirectoryError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn batch_lookup_skips_unknown_ids() {
        let dir = StaticDirectory::new()
            .with_user(sample(1, "alice"))
            .with_user(sample(2, "bob"));

        let profiles = dir.fetch_users(&[1, 99, 2]).await.unwrap();
        assert_eq!(profiles.len(), 2);

        assert!(matches!(
            dir.fetch_user(99).await,
            Err(DirectoryError::UnknownUser(99))
        ));
    }
}
