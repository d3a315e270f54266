//! Authentication Models
//!
//! Data structures for authentication requests, responses, token payloads,
//! and the user entity.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidateEmail, ValidationError};

// ============================================
// Database Entities
// ============================================

/// User entity from database
///
/// The `access_token`/`refresh_token` columns hold the single currently
/// valid pair for this user, or NULL when logged out. They are either both
/// set or both NULL.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    #[serde(skip_serializing)]
    #[sqlx(rename = "passwd_hash")]
    pub password_hash: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

// ============================================
// Token Payloads
// ============================================

/// Payload carried under the `data` claim of an access token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenData {
    pub id: String,
    pub expires_in: i64,
}

/// Payload carried under the `data` claim of a refresh token
///
/// `token` embeds the access token this refresh token was issued alongside,
/// making the pairing verifiable at refresh time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenData {
    pub id: String,
    pub expires_in: i64,
    pub token: String,
}

// ============================================
// Request DTOs
// ============================================

/// Signup/signin request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(custom(function = "validate_user_id"))]
    pub id: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// The user id must be an email address or an international phone number
fn validate_user_id(id: &str) -> Result<(), ValidationError> {
    if id.validate_email() || is_phone(id) {
        Ok(())
    } else {
        Err(ValidationError::new("email_or_phone"))
    }
}

fn is_phone(value: &str) -> bool {
    match value.strip_prefix('+') {
        Some(digits) => {
            (9..=18).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

// ============================================
// Response DTOs
// ============================================

/// Session issued by signup/signin/refresh
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: String,
    pub expires_in: i64,
    pub token: String,
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(id: &str, password: &str) -> CredentialsRequest {
        CredentialsRequest {
            id: id.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_email_id_accepted() {
        assert!(request("a@b.com", "pw").validate().is_ok());
    }

    #[test]
    fn test_phone_id_accepted() {
        assert!(request("+79261234567", "pw").validate().is_ok());
    }

    #[test]
    fn test_bad_id_rejected() {
        assert!(request("not-an-id", "pw").validate().is_err());
        assert!(request("+123", "pw").validate().is_err());
        assert!(request("+7926abc4567", "pw").validate().is_err());
    }

    #[test]
    fn test_empty_password_rejected() {
        assert!(request("a@b.com", "").validate().is_err());
    }
}
