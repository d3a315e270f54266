//! Database Setup
//!
//! Connection pool construction and startup migrations.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Create the connection pool
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .connect(database_url)
        .await
}

/// Run database migrations
pub async fn run_migrations(db: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running database migrations");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id VARCHAR(255) PRIMARY KEY,
            passwd_hash VARCHAR(255) NOT NULL,
            access_token TEXT,
            refresh_token TEXT
        );
        "#,
    )
    .execute(db)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS files (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            ext VARCHAR(8) NOT NULL,
            mime_type VARCHAR(64) NOT NULL,
            size BIGINT NOT NULL,
            registration_date TIMESTAMPTZ NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(db)
    .await?;

    tracing::info!("Database migrations completed");
    Ok(())
}
