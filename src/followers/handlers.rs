// src/followers/handlers.rs

use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use super::models::{CreateFollowerRequest, Follower, UpdateFollowerRequest};
use super::validators::FollowerValidator;
use crate::auth::AuthedUser;
use crate::common::{ensure_owner, generate_follower_id, ApiError, AppState, Validator};

/// GET /followers - List all followers owned by the authenticated user
pub async fn list_followers(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<Vec<Follower>>, ApiError> {
    let state = state_lock.read().await.clone();

    let followers = sqlx::query_as::<_, Follower>("SELECT * FROM followers WHERE user_id = ?")
        .bind(&authed.id)
        .fetch_all(&state.db)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %authed.id, "Database error fetching followers");
            ApiError::DatabaseError(e)
        })?;

    debug!(
        user_id = %authed.id,
        follower_count = followers.len(),
        "Fetched followers"
    );

    Ok(Json(followers))
}

/// POST /followers - Create a new follower for the authenticated user
pub async fn create_follower(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(request): Json<CreateFollowerRequest>,
) -> Result<(StatusCode, Json<Follower>), ApiError> {
    let state = state_lock.read().await.clone();

    let validator = FollowerValidator;
    let validation_result = validator.validate(&request);
    if !validation_result.is_valid {
        warn!(
            user_id = %authed.id,
            errors = ?validation_result.errors,
            "Follower creation validation failed"
        );
        return Err(ApiError::from(validation_result));
    }

    let follower_id = generate_follower_id();

    // Presence was just validated
    sqlx::query(
        r#"
        INSERT INTO followers
            (id, user_id, name, species, level, loyalty_points, is_elderly, joined_at, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, datetime('now'), datetime('now'))
        "#,
    )
    .bind(&follower_id)
    .bind(&authed.id)
    .bind(request.name.as_deref().unwrap_or_default())
    .bind(request.species.as_deref().unwrap_or_default())
    .bind(request.level.unwrap_or_default())
    .bind(request.loyalty_points.unwrap_or_default())
    .bind(request.is_elderly.unwrap_or_default())
    .bind(request.joined_at.as_deref().unwrap_or_default())
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(
            error = %e,
            user_id = %authed.id,
            follower_id = %follower_id,
            "Database error creating follower"
        );
        ApiError::DatabaseError(e)
    })?;

    let follower = fetch_follower(&state.db, &follower_id).await?.ok_or_else(|| {
        error!(follower_id = %follower_id, "Created follower missing on fetch-back");
        ApiError::InternalServer("Failed to load created follower".to_string())
    })?;

    info!(
        user_id = %authed.id,
        follower_id = %follower_id,
        "Follower created successfully"
    );

    Ok((StatusCode::CREATED, Json(follower)))
}

/// GET /followers/:id - Fetch a single follower
///
/// Existence is checked before ownership, so an unknown id is a 404 and
/// someone else's follower is a 403.
pub async fn show_follower(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(follower_id): Path<String>,
) -> Result<Json<Follower>, ApiError> {
    let state = state_lock.read().await.clone();

    let follower = require_follower(&state.db, &follower_id).await?;
    ensure_owner(&follower, &authed.id)?;

    Ok(Json(follower))
}

/// PATCH /followers/:id - Partially update a follower
///
/// Accepts any subset of {name, level, is_elderly, loyalty_points};
/// unspecified fields are left unchanged.
pub async fn update_follower(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(follower_id): Path<String>,
    Json(request): Json<UpdateFollowerRequest>,
) -> Result<Json<Follower>, ApiError> {
    let state = state_lock.read().await.clone();

    // Existence and ownership come first: an invalid body against an
    // unknown or foreign id is still a 404/403, not a 422
    let existing = require_follower(&state.db, &follower_id).await?;
    ensure_owner(&existing, &authed.id)?;

    let validator = FollowerValidator;
    let validation_result = validator.validate(&request);
    if !validation_result.is_valid {
        warn!(
            user_id = %authed.id,
            follower_id = %follower_id,
            errors = ?validation_result.errors,
            "Follower update validation failed"
        );
        return Err(ApiError::from(validation_result));
    }

    sqlx::query(
        r#"
        UPDATE followers
        SET name = COALESCE(?, name),
            level = COALESCE(?, level),
            is_elderly = COALESCE(?, is_elderly),
            loyalty_points = COALESCE(?, loyalty_points),
            updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(request.name.as_deref())
    .bind(request.level)
    .bind(request.is_elderly)
    .bind(request.loyalty_points)
    .bind(&follower_id)
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(
            error = %e,
            user_id = %authed.id,
            follower_id = %follower_id,
            "Database error updating follower"
        );
        ApiError::DatabaseError(e)
    })?;

    let follower = fetch_follower(&state.db, &follower_id).await?.ok_or_else(|| {
        error!(follower_id = %follower_id, "Updated follower missing on fetch-back");
        ApiError::InternalServer("Failed to load updated follower".to_string())
    })?;

    info!(
        user_id = %authed.id,
        follower_id = %follower_id,
        "Follower updated successfully"
    );

    Ok(Json(follower))
}

/// DELETE /followers/:id - Permanently delete a follower
pub async fn delete_follower(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(follower_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let follower = require_follower(&state.db, &follower_id).await?;
    ensure_owner(&follower, &authed.id)?;

    sqlx::query("DELETE FROM followers WHERE id = ?")
        .bind(&follower_id)
        .execute(&state.db)
        .await
        .map_err(|e| {
            error!(
                error = %e,
                user_id = %authed.id,
                follower_id = %follower_id,
                "Database error deleting follower"
            );
            ApiError::DatabaseError(e)
        })?;

    info!(
        user_id = %authed.id,
        follower_id = %follower_id,
        "Follower deleted successfully"
    );

    let resp = serde_json::json!({
        "message": "Follower deleted successfully"
    });
    Ok(Json(resp))
}

// ---- Helper Functions ----

async fn fetch_follower(
    pool: &SqlitePool,
    follower_id: &str,
) -> Result<Option<Follower>, ApiError> {
    sqlx::query_as::<_, Follower>("SELECT * FROM followers WHERE id = ?")
        .bind(follower_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            error!(error = %e, follower_id = %follower_id, "Database error fetching follower");
            ApiError::DatabaseError(e)
        })
}

async fn require_follower(pool: &SqlitePool, follower_id: &str) -> Result<Follower, ApiError> {
    fetch_follower(pool, follower_id).await?.ok_or_else(|| {
        warn!(follower_id = %follower_id, "Follower not found");
        ApiError::NotFound("Follower not found".to_string())
    })
}
