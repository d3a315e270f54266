//! Authentication Service
//!
//! The auth protocol: signup, signin, token refresh, logout, and session
//! introspection, orchestrating the credential hasher, the token service,
//! and the user repository.
//!
//! Tokens themselves are stateless; revocation comes from the session
//! columns on the user row. Persisting a freshly issued pair overwrites the
//! previous one, so at most one session per user is valid at any time.
//! Concurrent signin/refresh requests for the same user race at the persist
//! step; the last write wins and silently invalidates the loser's pair.

use std::sync::Arc;

use chrono::Utc;

use crate::auth::models::{AccessTokenData, RefreshTokenData, SessionResponse};
use crate::auth::password;
use crate::auth::repository::UserRepository;
use crate::auth::tokens::TokenSigner;
use crate::config::AppConfig;
use crate::error::ApiError;

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    access: TokenSigner,
    refresh: TokenSigner,
    pepper: String,
    token_ttl: i64,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, config: &AppConfig) -> Self {
        Self {
            users,
            access: TokenSigner::new(&config.access_secret),
            refresh: TokenSigner::new(&config.refresh_secret),
            pepper: config.access_secret.clone(),
            token_ttl: config.token_ttl,
        }
    }

    // ============================================
    // Signup / Signin
    // ============================================

    /// Create an account and open its first session
    pub async fn signup(&self, id: &str, password: &str) -> Result<SessionResponse, ApiError> {
        if self.users.find_by_id(id).await?.is_some() {
            return Err(ApiError::Conflict);
        }

        let password_hash = password::hash_password(&self.peppered(password))?;
        let user = self.users.create(id, &password_hash).await?;

        tracing::info!(user_id = %user.id, "User registered");

        self.open_session(&user.id).await
    }

    /// Authenticate and open a new session, superseding any previous one
    pub async fn signin(&self, id: &str, password: &str) -> Result<SessionResponse, ApiError> {
        let user = self.users.find_by_id(id).await?.ok_or(ApiError::Auth)?;

        if !password::verify_password(&user.password_hash, &self.peppered(password)) {
            tracing::debug!(user_id = %user.id, "Password verification failed");
            return Err(ApiError::Auth);
        }

        self.open_session(&user.id).await
    }

    // ============================================
    // Refresh
    // ============================================

    /// Exchange a refresh token for a brand-new pair
    ///
    /// The presented token must decode under the refresh secret, embed an
    /// access token whose signature verifies under the access secret (expiry
    /// deliberately not enforced: the access token is expected to be expired
    /// by refresh time), and exactly equal the user's currently stored
    /// refresh token. Using it supersedes it, so refresh tokens are
    /// single-use in practice.
    pub async fn refresh_session(&self, refresh_token: &str) -> Result<SessionResponse, ApiError> {
        let claims = self
            .refresh
            .decode::<RefreshTokenData>(refresh_token)
            .ok_or(ApiError::Auth)?;

        if self
            .access
            .decode_ignoring_expiry::<AccessTokenData>(&claims.data.token)
            .is_none()
        {
            tracing::debug!("Refresh token embeds an access token with a bad signature");
            return Err(ApiError::Auth);
        }

        let user = self
            .users
            .find_by_id(&claims.data.id)
            .await?
            .ok_or(ApiError::Auth)?;

        if user.refresh_token.as_deref() != Some(refresh_token) {
            tracing::debug!(user_id = %user.id, "Superseded refresh token rejected");
            return Err(ApiError::Auth);
        }

        self.open_session(&user.id).await
    }

    // ============================================
    // Logout / Introspection
    // ============================================

    /// Clear the stored session pair
    pub async fn logout(&self, id: &str) -> Result<(), ApiError> {
        if self.users.clear_tokens(id).await? == 0 {
            return Err(ApiError::Session);
        }

        tracing::info!(user_id = %id, "User logged out");
        Ok(())
    }

    /// Access guard core: validate a presented access token against both
    /// token validity and session-store equality
    ///
    /// Every failure collapses into `Unauthorized`: an absent user, an
    /// invalid or expired token, and a superseded token are indistinguishable
    /// to the caller.
    pub async fn authorize(&self, presented: &str) -> Result<String, ApiError> {
        let claims = self
            .access
            .decode::<AccessTokenData>(presented)
            .ok_or(ApiError::Unauthorized)?;

        let user = self
            .users
            .find_by_id(&claims.data.id)
            .await?
            .ok_or(ApiError::Unauthorized)?;

        if user.access_token.as_deref() != Some(presented) {
            return Err(ApiError::Unauthorized);
        }

        Ok(user.id)
    }

    // ============================================
    // Issuance
    // ============================================

    /// Issue an access/refresh pair and persist it onto the user row
    ///
    /// Persistence is the last step: a failure before it leaves the prior
    /// session state intact. Overwriting the stored pair is the revocation
    /// point for any previously issued session.
    async fn open_session(&self, id: &str) -> Result<SessionResponse, ApiError> {
        let expires_in = Utc::now().timestamp() + self.token_ttl;

        let access_token = self.access.issue(
            AccessTokenData {
                id: id.to_string(),
                expires_in,
            },
            self.token_ttl,
        )?;

        let refresh_token = self.refresh.issue(
            RefreshTokenData {
                id: id.to_string(),
                expires_in,
                token: access_token.clone(),
            },
            self.token_ttl,
        )?;

        let affected = self
            .users
            .update_tokens(id, &access_token, &refresh_token)
            .await?;

        if affected == 0 {
            return Err(ApiError::Session);
        }

        Ok(SessionResponse {
            id: id.to_string(),
            expires_in,
            token: access_token,
            refresh_token,
        })
    }

    fn peppered(&self, password: &str) -> String {
        format!("{}{}", password, self.pepper)
    }
}
