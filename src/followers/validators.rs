// src/followers/validators.rs

use chrono::NaiveDate;

use super::models::{CreateFollowerRequest, UpdateFollowerRequest};
use crate::common::{ValidationResult, Validator};

// ============================================================================
// Follower Validators
// ============================================================================

pub struct FollowerValidator;

impl Validator<CreateFollowerRequest> for FollowerValidator {
    fn validate(&self, data: &CreateFollowerRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        match &data.name {
            None => result.add_error("name", "Name is required"),
            Some(name) => result.merge(validate_name(name)),
        }

        match &data.species {
            None => result.add_error("species", "Species is required"),
            Some(species) if species.trim().is_empty() => {
                result.add_error("species", "Species is required")
            }
            Some(species) if species.len() > 50 => {
                result.add_error("species", "Species must be less than 50 characters")
            }
            Some(_) => {}
        }

        match data.level {
            None => result.add_error("level", "Level is required"),
            Some(level) => result.merge(validate_level(level)),
        }

        match data.loyalty_points {
            None => result.add_error("loyalty_points", "Loyalty points are required"),
            Some(points) => result.merge(validate_loyalty_points(points)),
        }

        if data.is_elderly.is_none() {
            result.add_error("is_elderly", "Elderly flag is required");
        }

        match &data.joined_at {
            None => result.add_error("joined_at", "Join date is required"),
            Some(joined_at) => {
                if NaiveDate::parse_from_str(joined_at, "%Y-%m-%d").is_err() {
                    result.add_error("joined_at", "Join date must be in YYYY-MM-DD format");
                }
            }
        }

        result
    }
}

impl Validator<UpdateFollowerRequest> for FollowerValidator {
    fn validate(&self, data: &UpdateFollowerRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        // Every field is optional; present fields follow the creation rules.
        // An empty update is a valid no-op.
        if let Some(name) = &data.name {
            result.merge(validate_name(name));
        }

        if let Some(level) = data.level {
            result.merge(validate_level(level));
        }

        if let Some(points) = data.loyalty_points {
            result.merge(validate_loyalty_points(points));
        }

        result
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn validate_name(name: &str) -> ValidationResult {
    let mut result = ValidationResult::new();
    if name.trim().is_empty() {
        result.add_error("name", "Name is required");
    } else if name.len() > 100 {
        result.add_error("name", "Name must be less than 100 characters");
    }
    result
}

fn validate_level(level: i64) -> ValidationResult {
    let mut result = ValidationResult::new();
    if level < 1 {
        result.add_error("level", "Level must be at least 1");
    }
    result
}

fn validate_loyalty_points(points: i64) -> ValidationResult {
    let mut result = ValidationResult::new();
    if points < 0 {
        result.add_error("loyalty_points", "Loyalty points cannot be negative");
    }
    result
}
