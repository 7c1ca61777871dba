//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `POST /register` - Create an account and receive a token
/// - `POST /login` - Exchange credentials for a token
/// - `GET /user` - Get current user information
/// - `POST /logout` - Revoke all tokens for the current user
pub fn auth_routes() -> Router {
    Router::new()
        .route("/register", post(handlers::register_handler))
        .route("/login", post(handlers::login_handler))
        .route("/user", get(handlers::me_handler))
        .route("/logout", post(handlers::logout_handler))
}
