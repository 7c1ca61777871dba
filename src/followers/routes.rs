// src/followers/routes.rs

use axum::{routing::get, Router};

use super::handlers;

/// Creates and returns the followers router
///
/// All routes require bearer authentication via the AuthedUser extractor.
pub fn followers_routes() -> Router {
    Router::new()
        .route(
            "/followers",
            get(handlers::list_followers).post(handlers::create_follower),
        )
        .route(
            "/followers/:id",
            get(handlers::show_follower)
                .patch(handlers::update_follower)
                .delete(handlers::delete_follower),
        )
}
