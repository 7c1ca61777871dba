//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use super::models::User;
use crate::common::{safe_email_log, safe_token_log, ApiError, AppState};

/// Authenticated user extractor
///
/// Resolves the bearer token from the Authorization header to a user
/// account. Tokens are opaque strings stored in the `tokens` table, so a
/// revoked (deleted) token fails the lookup the same way an unknown one does.
#[derive(Debug)]
pub struct AuthedUser {
    pub id: String,
    pub email: String,
    pub name: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Extract the Extension containing the AppState
        let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let app_state = state_lock.read().await.clone();

        // Extract Bearer token from Authorization header
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_string());

        let header = match header {
            Some(h) => h,
            None => {
                warn!("Authentication failed: missing Authorization header");
                return Err(ApiError::Unauthorized("missing auth".into()));
            }
        };

        // Handle "Bearer <token>" format or raw token
        let bare_token = if let Some(rest) = header.strip_prefix("Bearer ") {
            rest.to_string()
        } else {
            header
        };

        // Resolve the token to its owning user
        let user: Option<User> = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.name, u.email, u.password_hash, u.created_at, u.updated_at
            FROM users u
            INNER JOIN tokens t ON t.user_id = u.id
            WHERE t.token = ?
            "#,
        )
        .bind(&bare_token)
        .fetch_optional(&app_state.db)
        .await
        .map_err(|e| {
            error!(
                error = %e,
                token = %safe_token_log(&bare_token),
                "Database error during token lookup in authentication"
            );
            ApiError::DatabaseError(e)
        })?;

        match user {
            Some(u) => {
                debug!(
                    user_id = %u.id,
                    email = %safe_email_log(&u.email),
                    "User authentication successful via extractor"
                );
                Ok(AuthedUser {
                    id: u.id,
                    email: u.email,
                    name: u.name,
                })
            }
            None => {
                warn!(
                    token = %safe_token_log(&bare_token),
                    "Authentication failed: unknown or revoked token"
                );
                Err(ApiError::Unauthorized("invalid token".into()))
            }
        }
    }
}
