//! API Error Types
//!
//! Centralized error taxonomy for all operations. Every protocol outcome maps
//! to exactly one variant; the HTTP status mapping is a pure function of the
//! variant in [`IntoResponse`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// API errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// Malformed input, filtered before it reaches the protocol core.
    #[error("Wrong request: {0}")]
    Validation(String),

    /// Duplicate user id at signup.
    #[error("signup error: user id is already taken")]
    Conflict,

    /// Bad credentials, or an invalid/expired/superseded token presented to
    /// signin/refresh. The message is deliberately generic.
    #[error("authorization error")]
    Auth,

    /// Access guard rejection. Collapses every guard failure cause into one
    /// externally visible class.
    #[error("Unauthorized action")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(&'static str),

    /// A token persistence step affected zero rows. Internal fault, not a
    /// client error.
    #[error("session error: user row vanished")]
    Session,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("internal error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict => StatusCode::FORBIDDEN,
            ApiError::Auth | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Session
            | ApiError::Config(_)
            | ApiError::Database(_)
            | ApiError::Storage(_)
            | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        ApiError::Database(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("Storage I/O error: {:?}", err);
        ApiError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Conflict.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::Auth.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Session.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Validation("bad id".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("file").into_response().status(),
            StatusCode::NOT_FOUND
        );
    }
}
