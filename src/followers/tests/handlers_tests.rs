// src/followers/tests/handlers_tests.rs
//
// Handler tests against an in-memory database: ownership enforcement,
// partial updates, and existence-before-validation ordering.

#[cfg(test)]
mod tests {
    use axum::extract::{Extension, Json, Path};
    use axum::http::StatusCode;
    use sqlx::sqlite::SqlitePoolOptions;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use crate::auth::AuthedUser;
    use crate::common::{ApiError, AppState};
    use crate::followers::handlers;
    use crate::followers::models::*;

    /// Single-connection pool: each `sqlite::memory:` connection is its
    /// own database
    async fn test_state() -> Arc<RwLock<AppState>> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool connects");
        crate::common::migrations::run_migrations(&pool)
            .await
            .expect("migrations run");
        Arc::new(RwLock::new(AppState { db: pool }))
    }

    async fn seed_user(shared: &Arc<RwLock<AppState>>, id: &str, email: &str) {
        let pool = shared.read().await.db.clone();
        sqlx::query("INSERT INTO users (id, name, email, password_hash) VALUES (?, ?, ?, ?)")
            .bind(id)
            .bind("Leader")
            .bind(email)
            .bind("$argon2id$placeholder")
            .execute(&pool)
            .await
            .expect("user inserted");
    }

    fn as_user(id: &str) -> AuthedUser {
        AuthedUser {
            id: id.to_string(),
            email: format!("{}@cult.io", id.to_lowercase()),
            name: "Leader".to_string(),
        }
    }

    fn ratau_request() -> CreateFollowerRequest {
        CreateFollowerRequest {
            name: Some("Ratau".to_string()),
            species: Some("Rat".to_string()),
            level: Some(3),
            loyalty_points: Some(10),
            is_elderly: Some(false),
            joined_at: Some("2024-01-01".to_string()),
        }
    }

    fn empty_update() -> UpdateFollowerRequest {
        UpdateFollowerRequest {
            name: None,
            level: None,
            is_elderly: None,
            loyalty_points: None,
        }
    }

    async fn create_ratau(shared: &Arc<RwLock<AppState>>, owner: &str) -> Follower {
        let (status, follower) = handlers::create_follower(
            Extension(shared.clone()),
            as_user(owner),
            Json(ratau_request()),
        )
        .await
        .expect("follower created");
        assert_eq!(status, StatusCode::CREATED);
        follower.0
    }

    #[tokio::test]
    async fn test_create_binds_follower_to_caller() {
        let shared = test_state().await;
        seed_user(&shared, "U_AAAAAA", "a@cult.io").await;

        let follower = create_ratau(&shared, "U_AAAAAA").await;
        assert_eq!(follower.user_id, "U_AAAAAA");
        assert_eq!(follower.name, "Ratau");
        assert_eq!(follower.level, 3);
    }

    #[tokio::test]
    async fn test_cross_account_access_is_forbidden() {
        let shared = test_state().await;
        seed_user(&shared, "U_AAAAAA", "a@cult.io").await;
        seed_user(&shared, "U_BBBBBB", "b@cult.io").await;

        let follower = create_ratau(&shared, "U_AAAAAA").await;
        let id = follower.id.clone();

        // Not visible in the other account's listing
        let listing = handlers::list_followers(Extension(shared.clone()), as_user("U_BBBBBB"))
            .await
            .expect("lists");
        assert!(listing.0.is_empty());

        let shown = handlers::show_follower(
            Extension(shared.clone()),
            as_user("U_BBBBBB"),
            Path(id.clone()),
        )
        .await;
        assert!(matches!(shown, Err(ApiError::Forbidden(_))));

        let updated = handlers::update_follower(
            Extension(shared.clone()),
            as_user("U_BBBBBB"),
            Path(id.clone()),
            Json(UpdateFollowerRequest {
                level: Some(5),
                ..empty_update()
            }),
        )
        .await;
        assert!(matches!(updated, Err(ApiError::Forbidden(_))));

        let deleted = handlers::delete_follower(
            Extension(shared.clone()),
            as_user("U_BBBBBB"),
            Path(id.clone()),
        )
        .await;
        assert!(matches!(deleted, Err(ApiError::Forbidden(_))));

        // The owner still sees the untouched record
        let mine = handlers::show_follower(Extension(shared.clone()), as_user("U_AAAAAA"), Path(id))
            .await
            .expect("owner can fetch");
        assert_eq!(mine.0.level, 3);
    }

    #[tokio::test]
    async fn test_partial_update_leaves_other_fields_unchanged() {
        let shared = test_state().await;
        seed_user(&shared, "U_AAAAAA", "a@cult.io").await;

        let created = create_ratau(&shared, "U_AAAAAA").await;

        let updated = handlers::update_follower(
            Extension(shared.clone()),
            as_user("U_AAAAAA"),
            Path(created.id.clone()),
            Json(UpdateFollowerRequest {
                level: Some(5),
                ..empty_update()
            }),
        )
        .await
        .expect("updates")
        .0;

        assert_eq!(updated.level, 5);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.species, created.species);
        assert_eq!(updated.loyalty_points, created.loyalty_points);
        assert_eq!(updated.is_elderly, created.is_elderly);
        assert_eq!(updated.joined_at, created.joined_at);
    }

    #[tokio::test]
    async fn test_empty_update_is_a_noop() {
        let shared = test_state().await;
        seed_user(&shared, "U_AAAAAA", "a@cult.io").await;

        let created = create_ratau(&shared, "U_AAAAAA").await;

        let updated = handlers::update_follower(
            Extension(shared.clone()),
            as_user("U_AAAAAA"),
            Path(created.id.clone()),
            Json(empty_update()),
        )
        .await
        .expect("empty update succeeds")
        .0;

        assert_eq!(updated.name, created.name);
        assert_eq!(updated.level, created.level);
    }

    #[tokio::test]
    async fn test_delete_twice_returns_not_found() {
        let shared = test_state().await;
        seed_user(&shared, "U_AAAAAA", "a@cult.io").await;

        let follower = create_ratau(&shared, "U_AAAAAA").await;
        let id = follower.id.clone();

        handlers::delete_follower(
            Extension(shared.clone()),
            as_user("U_AAAAAA"),
            Path(id.clone()),
        )
        .await
        .expect("first delete succeeds");

        let second = handlers::delete_follower(
            Extension(shared.clone()),
            as_user("U_AAAAAA"),
            Path(id),
        )
        .await;
        assert!(matches!(second, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_checks_existence_and_ownership_before_validation() {
        let shared = test_state().await;
        seed_user(&shared, "U_AAAAAA", "a@cult.io").await;
        seed_user(&shared, "U_BBBBBB", "b@cult.io").await;

        let invalid_body = UpdateFollowerRequest {
            level: Some(0),
            ..empty_update()
        };

        // Unknown id wins over the invalid body
        let missing = handlers::update_follower(
            Extension(shared.clone()),
            as_user("U_AAAAAA"),
            Path("F_MISSNG".to_string()),
            Json(UpdateFollowerRequest {
                level: Some(0),
                ..empty_update()
            }),
        )
        .await;
        assert!(matches!(missing, Err(ApiError::NotFound(_))));

        // Foreign ownership wins over the invalid body
        let follower = create_ratau(&shared, "U_AAAAAA").await;
        let foreign = handlers::update_follower(
            Extension(shared.clone()),
            as_user("U_BBBBBB"),
            Path(follower.id.clone()),
            Json(invalid_body),
        )
        .await;
        assert!(matches!(foreign, Err(ApiError::Forbidden(_))));

        // With existence and ownership satisfied, validation still rejects
        let own = handlers::update_follower(
            Extension(shared.clone()),
            as_user("U_AAAAAA"),
            Path(follower.id),
            Json(UpdateFollowerRequest {
                level: Some(0),
                ..empty_update()
            }),
        )
        .await;
        assert!(matches!(own, Err(ApiError::ValidationError(_))));
    }
}
