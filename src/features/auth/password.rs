//! Password hashing and verification (argon2, PHC string format).

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tracing::{debug, error, instrument};

use crate::core::error::{AppError, Result};

/// Hash a plain-text password with a fresh random salt.
#[instrument(name = "password::hash", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String> {
    if password.is_empty() {
        return Err(AppError::Validation("Password cannot be empty".to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!(error = %e, "Argon2 password hashing failed");
            AppError::Internal(format!("Password hashing failed: {}", e))
        })
}

/// Verify a plain-text password against a stored hash.
///
/// Returns `Ok(false)` on mismatch; a stored hash that cannot be parsed is an internal error.
#[instrument(name = "password::verify", skip_all, err(Display))]
pub fn verify_password(stored_hash: &str, candidate: &str) -> Result<bool> {
    if candidate.is_empty() {
        return Ok(false);
    }

    let parsed = PasswordHash::new(stored_hash).map_err(|e| {
        error!(error = %e, "Stored password hash is malformed");
        AppError::Internal(format!("Invalid stored password hash: {}", e))
    })?;

    match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => {
            debug!("Password mismatch");
            Ok(false)
        }
        Err(e) => Err(AppError::Internal(format!(
            "Password verification failed: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("admin123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "admin123").unwrap());
        assert!(!verify_password(&hash, "admin124").unwrap());
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let first = hash_password("secret-pass").unwrap();
        let second = hash_password("secret-pass").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(hash_password("").is_err());
        let hash = hash_password("something").unwrap();
        assert!(!verify_password(&hash, "").unwrap());
        assert!(verify_password("not-a-phc-string", "something").is_err());
    }
}
