//! Application Configuration
//!
//! All configuration values are loaded from environment variables.
//! No hardcoded secrets or sensitive data.

use crate::error::ApiError;
use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection string (from DATABASE_URL env var)
    pub database_url: String,

    /// Socket address the server binds to (from BIND_ADDR env var)
    pub bind_addr: String,

    /// Secret key for signing access tokens (from JWT_SECRET env var).
    /// Also serves as the process-wide pepper appended to passwords before
    /// hashing.
    pub access_secret: String,

    /// Independent secret key for signing refresh tokens
    /// (from JWT_REFRESH_SECRET env var)
    pub refresh_secret: String,

    /// Token lifetime in seconds, shared by both token classes
    /// (from JWT_EXPIRATION env var)
    pub token_ttl: i64,

    /// Name of the request header carrying the raw token
    /// (from AUTH_HEADER_NAME env var)
    pub auth_header_name: String,

    /// Directory for uploaded file blobs (from UPLOAD_DIR env var)
    pub upload_dir: PathBuf,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Panics
    /// Panics if JWT_SECRET or JWT_REFRESH_SECRET is not set
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/filedepot".to_string()),

            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),

            access_secret: env::var("JWT_SECRET")
                .expect("JWT_SECRET environment variable must be set"),

            refresh_secret: env::var("JWT_REFRESH_SECRET")
                .expect("JWT_REFRESH_SECRET environment variable must be set"),

            token_ttl: env::var("JWT_EXPIRATION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1800), // 30 minutes default

            auth_header_name: env::var("AUTH_HEADER_NAME")
                .unwrap_or_else(|_| "token".to_string())
                .to_lowercase(),

            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.access_secret.len() < 32 {
            return Err(ApiError::Config(
                "JWT_SECRET must be at least 32 characters".to_string(),
            ));
        }

        if self.refresh_secret.len() < 32 {
            return Err(ApiError::Config(
                "JWT_REFRESH_SECRET must be at least 32 characters".to_string(),
            ));
        }

        if self.refresh_secret == self.access_secret {
            return Err(ApiError::Config(
                "JWT_REFRESH_SECRET must differ from JWT_SECRET".to_string(),
            ));
        }

        if self.token_ttl <= 0 {
            return Err(ApiError::Config(
                "JWT_EXPIRATION must be positive".to_string(),
            ));
        }

        if self.auth_header_name.is_empty() {
            return Err(ApiError::Config(
                "AUTH_HEADER_NAME must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        AppConfig {
            database_url: "postgres://localhost/filedepot".to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
            access_secret: "a".repeat(32),
            refresh_secret: "b".repeat(32),
            token_ttl: 1800,
            auth_header_name: "token".to_string(),
            upload_dir: PathBuf::from("uploads"),
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_config_validation_short_secret() {
        let config = AppConfig {
            access_secret: "short".to_string(),
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_equal_secrets() {
        let config = AppConfig {
            refresh_secret: "a".repeat(32),
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_ttl() {
        let config = AppConfig {
            token_ttl: 0,
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }
}
