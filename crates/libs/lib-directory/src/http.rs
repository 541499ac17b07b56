//! # HTTP Directory Client
//!
//! Talks to the remote account directory service:
//!
//! - `GET {base}/api/session` with the bearer token → caller identity
//! - `GET {base}/api/users/{id}` → single profile
//! - `GET {base}/api/users?ids=1,2,3` → batch of profiles

use crate::{CallerIdentity, Directory, DirectoryError, UserProfile};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct SessionResponse {
    user_id: i64,
    name: String,
}

/// Directory client backed by a remote HTTP service.
#[derive(Clone)]
pub struct HttpDirectory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDirectory {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Directory for HttpDirectory {
    async fn verify_token(&self, bearer: &str) -> Result<CallerIdentity, DirectoryError> {
        let response = self
            .client
            .get(self.url("/api/session"))
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| DirectoryError::Transport(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(DirectoryError::InvalidToken);
        }

        let session: SessionResponse = response
            .error_for_status()
            .map_err(|e| DirectoryError::Transport(e.to_string()))?
            .json()
            .await
            .map_err(|e| DirectoryError::Transport(e.to_string()))?;

        Ok(CallerIdentity {
            user_id: session.user_id,
            name: session.name,
        })
    }

    async fn fetch_user(&self, id: i64) -> Result<UserProfile, DirectoryError> {
        let response = self
            .client
            .get(self.url(&format!("/api/users/{}", id)))
            .send()
            .await
            .map_err(|e| DirectoryError::Transport(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(DirectoryError::UnknownUser(id));
        }

        response
            .error_for_status()
            .map_err(|e| DirectoryError::Transport(e.to_string()))?
            .json()
            .await
            .map_err(|e| DirectoryError::Transport(e.to_string()))
    }

    async fn fetch_users(&self, ids: &[i64]) -> Result<Vec<UserProfile>, DirectoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let joined = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let profiles: Vec<UserProfile> = self
            .client
            .get(self.url("/api/users"))
            .query(&[("ids", joined.as_str())])
            .send()
            .await
            .map_err(|e| DirectoryError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| DirectoryError::Transport(e.to_string()))?
            .json()
            .await
            .map_err(|e| DirectoryError::Transport(e.to_string()))?;

        if profiles.len() != ids.len() {
            warn!(
                requested = ids.len(),
                resolved = profiles.len(),
                "directory resolved fewer users than requested"
            );
        }

        Ok(profiles)
    }
}
