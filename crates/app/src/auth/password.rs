//! Password hashing.

use argon2::{
    Argon2,
    password_hash::{
        Error as ArgonError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("password must not be empty")]
    Empty,

    #[error("password hashing failed: {0}")]
    Hash(ArgonError),
}

/// Hash a plain-text password with Argon2 and a fresh OS-random salt.
///
/// # Errors
///
/// Returns an error for an empty password or an internal hashing failure.
pub fn hash_password(password: &str) -> Result<String, PasswordHashError> {
    if password.is_empty() {
        return Err(PasswordHashError::Empty);
    }

    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(PasswordHashError::Hash)
}

/// Verify a plain-text password against a stored hash.
///
/// Returns `Ok(false)` for a mismatch; errors are reserved for a malformed
/// stored hash or an internal failure.
///
/// # Errors
///
/// Returns an error when the stored hash cannot be parsed or verification
/// fails for a reason other than a mismatch.
pub fn verify_password(stored_hash: &str, password: &str) -> Result<bool, PasswordHashError> {
    let parsed = PasswordHash::new(stored_hash).map_err(PasswordHashError::Hash)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(ArgonError::Password) => Ok(false),
        Err(error) => Err(PasswordHashError::Hash(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("hunter2!").expect("hashing should succeed");

        assert!(verify_password(&hash, "hunter2!").expect("verify should succeed"));
        assert!(!verify_password(&hash, "hunter3!").expect("verify should succeed"));
    }

    #[test]
    fn empty_password_is_rejected() {
        assert!(matches!(hash_password(""), Err(PasswordHashError::Empty)));
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("hunter2!").expect("hashing should succeed");
        let second = hash_password("hunter2!").expect("hashing should succeed");

        assert_ne!(first, second, "equal passwords must hash differently");
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        assert!(verify_password("not-a-phc-string", "hunter2!").is_err());
    }
}
