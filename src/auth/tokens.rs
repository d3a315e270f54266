//! Token Service
//!
//! Signs and verifies compact, self-contained, time-limited HS256 tokens
//! carrying an opaque payload under the `data` claim. Tokens are stateless
//! and self-verifying; revocation is layered on top by the auth protocol via
//! the session columns on the user row, since a stateless token cannot be
//! recalled before its natural expiry.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// Claims layout shared by both token classes
///
/// `jti` makes every issued token unique even for identical payloads signed
/// within the same second; without it a re-issued pair could be
/// byte-identical to the pair it supersedes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims<T> {
    pub data: T,
    pub iat: i64,
    pub exp: i64,
    pub jti: Uuid,
}

/// Signer/verifier bound to one secret
///
/// Two instances exist in the process: one for access tokens, one for refresh
/// tokens. Possession of a refresh token therefore does not allow forging a
/// fresh access token outside the issuance protocol.
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a signed token expiring `ttl_seconds` from now
    pub fn issue<T: Serialize>(&self, data: T, ttl_seconds: i64) -> Result<String, ApiError> {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            data,
            iat: now,
            exp: now + ttl_seconds,
            jti: Uuid::new_v4(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|err| {
            tracing::error!("Token signing error: {:?}", err);
            ApiError::Internal
        })
    }

    /// Verify and decode a token
    ///
    /// Returns `None` (never an error) if the signature is invalid, the token
    /// is malformed, or it has expired. Expiry is exact, with no leeway.
    pub fn decode<T: DeserializeOwned>(&self, token: &str) -> Option<TokenClaims<T>> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<TokenClaims<T>>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .ok()
    }

    /// Decode checking the signature but not the expiry
    ///
    /// Used for the refresh pairing check only: the access token embedded in
    /// a refresh token is expected to be expired by the time the refresh is
    /// presented, but it must still carry a valid signature.
    pub fn decode_ignoring_expiry<T: DeserializeOwned>(&self, token: &str) -> Option<TokenClaims<T>> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        validation.validate_exp = false;

        decode::<TokenClaims<T>>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Payload {
        id: String,
        seq: u32,
    }

    fn payload() -> Payload {
        Payload {
            id: "a@b.com".to_string(),
            seq: 7,
        }
    }

    fn signer() -> TokenSigner {
        TokenSigner::new("0123456789abcdef0123456789abcdef")
    }

    #[test]
    fn test_round_trip() {
        let token = signer().issue(payload(), 60).unwrap();
        let claims = signer().decode::<Payload>(&token).unwrap();
        assert_eq!(claims.data, payload());
        assert_eq!(claims.exp - claims.iat, 60);
    }

    #[test]
    fn test_expired_token_decodes_to_none() {
        let token = signer().issue(payload(), -10).unwrap();
        assert!(signer().decode::<Payload>(&token).is_none());
    }

    #[test]
    fn test_expired_token_passes_signature_only_check() {
        let token = signer().issue(payload(), -10).unwrap();
        let claims = signer().decode_ignoring_expiry::<Payload>(&token).unwrap();
        assert_eq!(claims.data, payload());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = signer().issue(payload(), 60).unwrap();
        let other = TokenSigner::new("fedcba9876543210fedcba9876543210");
        assert!(other.decode::<Payload>(&token).is_none());
        assert!(other.decode_ignoring_expiry::<Payload>(&token).is_none());
    }

    #[test]
    fn test_reissued_token_differs() {
        let first = signer().issue(payload(), 60).unwrap();
        let second = signer().issue(payload(), 60).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_token_rejected() {
        assert!(signer().decode::<Payload>("garbage").is_none());
        assert!(signer().decode::<Payload>("").is_none());

        let mut tampered = signer().issue(payload(), 60).unwrap();
        tampered.pop();
        assert!(signer().decode::<Payload>(&tampered).is_none());
    }
}
