//! Authentication
//!
//! Credential hashing, token issuance/verification, the session-binding
//! protocol, and the access guard.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod tokens;

pub use extractors::AuthUser;
pub use models::User;
pub use repository::{PgUserRepository, UserRepository};
pub use service::AuthService;
pub use tokens::{TokenClaims, TokenSigner};
