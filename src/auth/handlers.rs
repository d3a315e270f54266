//! Authentication HTTP Handlers
//!
//! Thin controllers mapping requests onto the auth service. The refresh
//! endpoint reads the refresh token from the same configured header the
//! access guard reads access tokens from.

use axum::{extract::State, http::HeaderMap, response::IntoResponse, Json};
use validator::Validate;

use crate::auth::extractors::AuthUser;
use crate::auth::models::CredentialsRequest;
use crate::error::ApiError;
use crate::AppState;

/// POST /signup
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|err| ApiError::Validation(err.to_string()))?;

    let session = state.auth.signup(&req.id, &req.password).await?;
    Ok(Json(session))
}

/// POST /signin
pub async fn signin(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|err| ApiError::Validation(err.to_string()))?;

    let session = state.auth.signin(&req.id, &req.password).await?;
    Ok(Json(session))
}

/// POST /signin/new_token
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let refresh_token = headers
        .get(state.config.auth_header_name.as_str())
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::Auth)?;

    let session = state.auth.refresh_session(refresh_token).await?;
    Ok(Json(session))
}

/// GET /logout
pub async fn logout(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    state.auth.logout(&user.id).await?;
    Ok("Ok")
}

/// GET /info
pub async fn info(user: AuthUser) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(serde_json::json!({ "id": user.id })))
}
