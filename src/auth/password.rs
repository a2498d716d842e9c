//! Password hashing and verification
//!
//! Argon2id with random per-password salts, stored as PHC strings.
//! Verification is constant-time inside argon2.

use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;
use thiserror::Error;

use crate::domain::DomainError;

/// Minimum password length in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length in characters
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

/// Validate a raw password against the length policy
pub fn validate_password(raw: &str) -> Result<(), DomainError> {
    if raw.trim().is_empty() {
        return Err(DomainError::MissingField("password"));
    }
    let char_count = raw.chars().count();
    if char_count < MIN_PASSWORD_LENGTH {
        return Err(DomainError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
            actual: char_count,
        });
    }
    if char_count > MAX_PASSWORD_LENGTH {
        return Err(DomainError::PasswordTooLong {
            max: MAX_PASSWORD_LENGTH,
            actual: char_count,
        });
    }
    Ok(())
}

/// Hash a password with Argon2id and a fresh random salt
pub fn hash_password(raw: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(raw.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash string
///
/// Returns false for a bad password or an unparseable hash; the caller
/// treats both as an invalid credential.
pub fn verify_password(raw: &str, phc_hash: &str) -> bool {
    let parsed = match PasswordHash::new(phc_hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(raw.as_bytes(), &parsed)
        .is_ok()
}
