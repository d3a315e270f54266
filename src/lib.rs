//! filedepot
//!
//! File storage API with token-bound session authentication:
//! - signup/signin with salted, peppered Argon2id password hashing
//! - JWT access/refresh pair bound to the user row for server-side revocation
//! - single active session per user; refresh rotation supersedes old pairs
//! - file upload/download with metadata rows and a disk blob store
//!
//! # Configuration
//!
//! All configuration is loaded from environment variables:
//! - `DATABASE_URL` - PostgreSQL connection string
//! - `BIND_ADDR` - listen address (default: "0.0.0.0:3000")
//! - `JWT_SECRET` - access token secret (required, min 32 chars)
//! - `JWT_REFRESH_SECRET` - refresh token secret (required, min 32 chars)
//! - `JWT_EXPIRATION` - token lifetime in seconds for both classes (default: 1800)
//! - `AUTH_HEADER_NAME` - header carrying the raw token (default: "token")
//! - `UPLOAD_DIR` - blob directory (default: "uploads")

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod files;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use auth::AuthService;
pub use config::AppConfig;
pub use error::ApiError;
pub use files::FileService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: Arc<AuthService>,
    pub files: Arc<FileService>,
}

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    // Public routes (no session required)
    let public = Router::new()
        .route("/signup", post(auth::handlers::signup))
        .route("/signin", post(auth::handlers::signin))
        .route("/signin/new_token", post(auth::handlers::refresh));

    // Protected routes (require a valid, currently bound access token)
    let protected = Router::new()
        .route("/logout", get(auth::handlers::logout))
        .route("/info", get(auth::handlers::info))
        .route("/file/list", get(files::handlers::list_files))
        .route("/file/upload", post(files::handlers::upload_file))
        .route("/file/update/:id", put(files::handlers::update_file))
        .route("/file/download/:id", get(files::handlers::download_file))
        .route("/file/:id", get(files::handlers::get_file))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_session,
        ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(public)
        .merge(protected)
        // multipart overhead on top of the file size cap
        .layer(DefaultBodyLimit::max(files::handlers::MAX_FILE_SIZE + 1024 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
