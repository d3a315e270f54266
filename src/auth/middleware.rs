//! Access Guard Middleware
//!
//! Gate applied to protected routes. Validates the request's token header
//! against both token validity and session-store equality, then exposes the
//! authenticated id to downstream handlers through request extensions.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::extractors::AuthUser;
use crate::error::ApiError;
use crate::AppState;

/// Require a valid, currently bound access token
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = req
        .headers()
        .get(state.config.auth_header_name.as_str())
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let id = state.auth.authorize(presented).await?;
    req.extensions_mut().insert(AuthUser { id });

    Ok(next.run(req).await)
}
