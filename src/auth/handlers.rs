//! Authentication handlers

use axum::extract::{Extension, Json};
use axum::http::StatusCode;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::extractors::AuthedUser;
use super::models::{LoginRequest, RegisterRequest, User};
use super::password::{hash_password, verify_password};
use super::validators::{LoginValidator, RegisterValidator};
use crate::common::{
    generate_bearer_token, generate_token_id, generate_user_id, safe_email_log, ApiError,
    AppState, Validator,
};

/// POST /register
/// Creates a new user account and issues an API token
///
/// # Request Body
/// ```json
/// {
///   "name": "Narinder",
///   "email": "n@cult.io",
///   "password": "shepherd1",
///   "password_confirmation": "shepherd1"
/// }
/// ```
///
/// # Response (201)
/// ```json
/// {
///   "user": { ... },
///   "token": "<opaque token>"
/// }
/// ```
pub async fn register_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let state = state_lock.read().await.clone();

    let validator = RegisterValidator;
    let validation_result = validator.validate(&request);
    if !validation_result.is_valid {
        warn!(
            errors = ?validation_result.errors,
            "Registration validation failed"
        );
        return Err(ApiError::from(validation_result));
    }

    // Presence was just validated
    let name = request.name.as_deref().unwrap_or_default();
    let email = request.email.as_deref().unwrap_or_default();
    let password = request.password.as_deref().unwrap_or_default();

    info!(email = %safe_email_log(email), "Registering new user");

    // Pre-check for a friendlier error; the UNIQUE constraint below still
    // closes the race between concurrent registrations
    let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(&state.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error checking existing email");
            ApiError::DatabaseError(e)
        })?;

    if existing.is_some() {
        warn!(email = %safe_email_log(email), "Registration rejected: email already taken");
        return Err(ApiError::validation(
            "email",
            "The email has already been taken",
        ));
    }

    let password_hash = hash_password(password)?;
    let user_id = generate_user_id();

    if let Err(e) = sqlx::query(
        r#"
        INSERT INTO users (id, name, email, password_hash, created_at, updated_at)
        VALUES (?, ?, ?, ?, datetime('now'), datetime('now'))
        "#,
    )
    .bind(&user_id)
    .bind(name)
    .bind(email)
    .bind(&password_hash)
    .execute(&state.db)
    .await
    {
        // A concurrent registration may have won the race since the pre-check
        if is_unique_violation(&e) {
            warn!(email = %safe_email_log(email), "Registration lost uniqueness race");
            return Err(ApiError::validation(
                "email",
                "The email has already been taken",
            ));
        }
        error!(error = %e, user_id = %user_id, "Database error inserting new user");
        return Err(ApiError::DatabaseError(e));
    }

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&user_id)
        .fetch_one(&state.db)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %user_id, "Database error fetching created user");
            ApiError::DatabaseError(e)
        })?;

    let token = issue_token(&state.db, &user.id).await?;

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        "User registered successfully"
    );

    let resp = serde_json::json!({
        "user": user,
        "token": token,
    });

    Ok((StatusCode::CREATED, Json(resp)))
}

/// POST /login
/// Verifies credentials and issues a new API token
///
/// Unknown email and wrong password return the same generic error so the
/// response does not reveal which one was wrong.
pub async fn login_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let validator = LoginValidator;
    let validation_result = validator.validate(&request);
    if !validation_result.is_valid {
        warn!(errors = ?validation_result.errors, "Login validation failed");
        return Err(ApiError::from(validation_result));
    }

    let email = request.email.as_deref().unwrap_or_default();
    let password = request.password.as_deref().unwrap_or_default();

    let user: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(&state.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error during login lookup");
            ApiError::DatabaseError(e)
        })?;

    let user = match user {
        Some(u) if verify_password(password, &u.password_hash) => u,
        _ => {
            warn!(email = %safe_email_log(email), "Login failed: invalid credentials");
            return Err(ApiError::validation("email", "Invalid credentials."));
        }
    };

    let token = issue_token(&state.db, &user.id).await?;

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        "User logged in successfully"
    );

    let resp = serde_json::json!({
        "user": user,
        "token": token,
    });

    Ok(Json(resp))
}

/// GET /user
/// Returns the authenticated user's account
pub async fn me_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<User>, ApiError> {
    let state = state_lock.read().await.clone();

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&authed.id)
        .fetch_one(&state.db)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %authed.id, "Database error fetching current user");
            ApiError::DatabaseError(e)
        })?;

    Ok(Json(user))
}

/// POST /logout
/// Revokes every token for the caller, ending all active sessions.
/// Idempotent: succeeds even when no tokens remain.
pub async fn logout_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let result = sqlx::query("DELETE FROM tokens WHERE user_id = ?")
        .bind(&authed.id)
        .execute(&state.db)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %authed.id, "Database error revoking tokens");
            ApiError::DatabaseError(e)
        })?;

    info!(
        user_id = %authed.id,
        revoked = result.rows_affected(),
        "User logged out"
    );

    let resp = serde_json::json!({
        "message": "Logged out successfully"
    });
    Ok(Json(resp))
}

// ---- Helper Functions ----

/// Create and persist a fresh opaque bearer token for a user
async fn issue_token(pool: &SqlitePool, user_id: &str) -> Result<String, ApiError> {
    let token = generate_bearer_token();

    sqlx::query(
        r#"
        INSERT INTO tokens (id, user_id, token, created_at)
        VALUES (?, ?, ?, datetime('now'))
        "#,
    )
    .bind(generate_token_id())
    .bind(user_id)
    .bind(&token)
    .execute(pool)
    .await
    .map_err(|e| {
        error!(error = %e, user_id = %user_id, "Database error issuing token");
        ApiError::DatabaseError(e)
    })?;

    Ok(token)
}

/// True when an INSERT failed on a UNIQUE constraint
fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.message().contains("UNIQUE constraint failed"))
}
