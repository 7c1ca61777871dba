// src/auth/validators.rs

use regex::Regex;
use std::sync::OnceLock;

use super::models::{LoginRequest, RegisterRequest};
use crate::common::{ValidationResult, Validator};

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

/// Loose email shape check: one '@', non-empty local part, dotted domain
pub fn is_valid_email(email: &str) -> bool {
    let re = EMAIL_RE
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid"));
    re.is_match(email)
}

// ============================================================================
// Account Validators
// ============================================================================

pub struct RegisterValidator;

impl Validator<RegisterRequest> for RegisterValidator {
    fn validate(&self, data: &RegisterRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        match &data.name {
            None => result.add_error("name", "Name is required"),
            Some(name) if name.trim().is_empty() => result.add_error("name", "Name is required"),
            Some(name) if name.len() > 255 => {
                result.add_error("name", "Name must be less than 255 characters")
            }
            Some(_) => {}
        }

        match &data.email {
            None => result.add_error("email", "Email is required"),
            Some(email) if email.trim().is_empty() => {
                result.add_error("email", "Email is required")
            }
            Some(email) if !is_valid_email(email) => {
                result.add_error("email", "Email must be a valid email address")
            }
            Some(_) => {}
        }

        match &data.password {
            None => result.add_error("password", "Password is required"),
            Some(password) if password.is_empty() => {
                result.add_error("password", "Password is required")
            }
            Some(password) if password.len() < 8 => {
                result.add_error("password", "Password must be at least 8 characters")
            }
            Some(password) => {
                if data.password_confirmation.as_deref() != Some(password.as_str()) {
                    result.add_error("password", "Password confirmation does not match");
                }
            }
        }

        result
    }
}

pub struct LoginValidator;

impl Validator<LoginRequest> for LoginValidator {
    fn validate(&self, data: &LoginRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        match &data.email {
            None => result.add_error("email", "Email is required"),
            Some(email) if email.trim().is_empty() => {
                result.add_error("email", "Email is required")
            }
            Some(email) if !is_valid_email(email) => {
                result.add_error("email", "Email must be a valid email address")
            }
            Some(_) => {}
        }

        match &data.password {
            None => result.add_error("password", "Password is required"),
            Some(password) if password.is_empty() => {
                result.add_error("password", "Password is required")
            }
            Some(_) => {}
        }

        result
    }
}
