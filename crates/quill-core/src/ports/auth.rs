//! Authentication and authorization ports.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Fixed lifetime of a session token.
pub const SESSION_TTL_HOURS: i64 = 7 * 24;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub is_admin: bool,
    pub issued_at: i64,
    pub exp: i64,
}

/// Token service trait for issuing and verifying signed session tokens.
///
/// Tokens are stateless: nothing is recorded server-side, so a token stays valid until it
/// expires regardless of later account changes.
pub trait TokenService: Send + Sync {
    /// Issue a token as if the current time were `issued_at`.
    fn generate_token_at(
        &self,
        user_id: Uuid,
        is_admin: bool,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AuthError>;

    /// Verify signature and issuer, then check expiry against `now`.
    fn validate_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, AuthError>;

    /// Lifetime of issued tokens, in seconds.
    fn expiration_seconds(&self) -> i64;

    fn generate_token(&self, user_id: Uuid, is_admin: bool) -> Result<String, AuthError> {
        self.generate_token_at(user_id, is_admin, Utc::now())
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.validate_token_at(token, Utc::now())
    }
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password with a fresh salt.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("No token provided")]
    MissingAuth,

    #[error("Access denied. Admins only.")]
    InsufficientPermissions,

    #[error("Missing JWT secret")]
    MissingSecret,

    #[error("Hashing error: {0}")]
    HashingError(String),
}
