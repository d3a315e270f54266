//! User Repository
//!
//! The persistence seam for the auth protocol. The trait exposes only the
//! four operations the protocol needs, which keeps the core testable against
//! an in-memory fake without a running database.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::models::User;
use crate::error::ApiError;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, ApiError>;

    async fn create(&self, id: &str, password_hash: &str) -> Result<User, ApiError>;

    /// Overwrite the stored token pair, returning the affected row count
    async fn update_tokens(
        &self,
        id: &str,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<u64, ApiError>;

    /// Clear the stored token pair, returning the affected row count
    async fn clear_tokens(&self, id: &str) -> Result<u64, ApiError>;
}

/// PostgreSQL-backed repository
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    async fn create(&self, id: &str, password_hash: &str) -> Result<User, ApiError> {
        let user = sqlx::query_as(
            "INSERT INTO users (id, passwd_hash) VALUES ($1, $2) RETURNING *",
        )
        .bind(id)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await?;

        Ok(user)
    }

    async fn update_tokens(
        &self,
        id: &str,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<u64, ApiError> {
        let result =
            sqlx::query("UPDATE users SET access_token = $2, refresh_token = $3 WHERE id = $1")
                .bind(id)
                .bind(access_token)
                .bind(refresh_token)
                .execute(&self.db)
                .await?;

        Ok(result.rows_affected())
    }

    async fn clear_tokens(&self, id: &str) -> Result<u64, ApiError> {
        let result =
            sqlx::query("UPDATE users SET access_token = NULL, refresh_token = NULL WHERE id = $1")
                .bind(id)
                .execute(&self.db)
                .await?;

        Ok(result.rows_affected())
    }
}
