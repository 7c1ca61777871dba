//! Password hashing with Argon2id
//!
//! Only the PHC-format hash is ever stored; plaintext passwords exist
//! solely inside the register/login request handlers.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::common::ApiError;

/// Hash a password using Argon2id with a fresh random salt
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| ApiError::InternalServer("Failed to hash password".to_string()))
}

/// Verify a password against a stored PHC hash string
///
/// Returns false for both a wrong password and an unparseable hash;
/// callers treat either as invalid credentials.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
