//! # Authentication Middleware
//!
//! Resolves the `Authorization: Bearer <token>` header through the external
//! account directory and injects the resulting [`CallerIdentity`] into
//! request extensions.
//!
//! Handlers extract the caller with `Extension<CallerIdentity>`:
//!
//! ```rust,no_run
//! use axum::extract::Extension;
//! use lib_directory::CallerIdentity;
//!
//! async fn protected_handler(Extension(caller): Extension<CallerIdentity>) -> String {
//!     format!("Hello, user {}!", caller.user_id)
//! }
//! ```

use crate::server::AppState;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use lib_core::AppError;
use lib_directory::DirectoryError;
use tracing::{debug, warn};

/// Authentication middleware for protected routes.
///
/// # Behavior
///
/// - **Valid token**: continues with `CallerIdentity` in extensions
/// - **Missing/invalid token**: `401 Unauthorized`
/// - **Directory unreachable**: `502 Bad Gateway`
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            warn!("[AUTH] Missing Authorization header");
            AppError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        warn!("[AUTH] Invalid Authorization header format");
        AppError::Unauthorized("Invalid authorization format".to_string())
    })?;

    let identity = state.directory.verify_token(token).await.map_err(|e| match e {
        DirectoryError::InvalidToken => {
            warn!("[AUTH] Token rejected by directory");
            AppError::Unauthorized("Invalid token".to_string())
        }
        other => AppError::Directory(other.to_string()),
    })?;

    debug!(
        "[AUTH] Authenticated user: {} (id: {})",
        identity.name, identity.user_id
    );

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
