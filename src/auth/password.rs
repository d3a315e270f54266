//! Credential Hashing
//!
//! One-way password hashing with Argon2id. The caller appends the
//! process-wide pepper to the plaintext before both hashing and verification,
//! so a leaked hash table alone is not enough to attack the raw passwords.

use crate::error::ApiError;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a peppered password into a PHC-format string
pub fn hash_password(plaintext: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|err| {
            tracing::error!("Password hashing error: {:?}", err);
            ApiError::Internal
        })?
        .to_string();

    Ok(hash)
}

/// Verify a peppered password against a stored hash
///
/// Returns `false` for a wrong password and for malformed hash input; never
/// errors.
pub fn verify_password(hash: &str, plaintext: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("pw-secret").unwrap();
        assert!(verify_password(&hash, "pw-secret"));
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hash = hash_password("pw-secret").unwrap();
        assert!(!verify_password(&hash, "pw-other"));
    }

    #[test]
    fn test_malformed_hash_rejected_without_panic() {
        assert!(!verify_password("not a phc string", "pw-secret"));
        assert!(!verify_password("", "pw-secret"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("pw-secret").unwrap();
        let b = hash_password("pw-secret").unwrap();
        assert_ne!(a, b);
    }
}
