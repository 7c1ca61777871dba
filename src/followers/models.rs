// src/followers/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::common::Owned;

// ============================================================================
// Follower Models
// ============================================================================

/// A cult disciple owned by exactly one user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Follower {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub species: String,
    pub level: i64,
    pub loyalty_points: i64,
    pub is_elderly: bool,
    pub joined_at: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Owned for Follower {
    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

// Request models for follower management.
// Fields are optional so the validator can report every missing field
// together instead of failing on the first one at deserialization time.

#[derive(Debug, Deserialize)]
pub struct CreateFollowerRequest {
    pub name: Option<String>,
    pub species: Option<String>,
    pub level: Option<i64>,
    pub loyalty_points: Option<i64>,
    pub is_elderly: Option<bool>,
    pub joined_at: Option<String>,
}

/// Partial update: species and joined_at are fixed at creation
#[derive(Debug, Deserialize)]
pub struct UpdateFollowerRequest {
    pub name: Option<String>,
    pub level: Option<i64>,
    pub is_elderly: Option<bool>,
    pub loyalty_points: Option<i64>,
}
