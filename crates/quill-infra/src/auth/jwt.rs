//! JWT token service implementation.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quill_core::ports::{AuthError, SESSION_TTL_HOURS, TokenClaims, TokenService};

/// JWT token service configuration.
#[derive(Clone)]
pub struct JwtConfig {
    /// Signing secret. Without one, tokens can be neither issued nor verified.
    pub secret: Option<String>,
    pub expiration_hours: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: None,
            expiration_hours: SESSION_TTL_HOURS,
            issuer: "quill-api".to_string(),
        }
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("expiration_hours", &self.expiration_hours)
            .field("issuer", &self.issuer)
            .finish()
    }
}

/// Internal JWT claims structure for serialization.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // user_id
    is_admin: bool,
    exp: i64,    // expiration timestamp
    iat: i64,    // issued at
    iss: String, // issuer
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// JWT-based token service (HS256).
pub struct JwtTokenService {
    keys: Option<Keys>,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let keys = config.secret.as_deref().map(|secret| Keys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        });

        if keys.is_none() {
            tracing::warn!("JWT secret not configured; logins and protected routes will fail");
        }

        Self { keys, config }
    }

    fn keys(&self) -> Result<&Keys, AuthError> {
        self.keys.as_ref().ok_or(AuthError::MissingSecret)
    }
}

impl TokenService for JwtTokenService {
    fn generate_token_at(
        &self,
        user_id: Uuid,
        is_admin: bool,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let keys = self.keys()?;
        let exp = issued_at + TimeDelta::hours(self.config.expiration_hours);

        let claims = Claims {
            sub: user_id.to_string(),
            is_admin,
            exp: exp.timestamp(),
            iat: issued_at.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn validate_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, AuthError> {
        let keys = self.keys()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        // Expiry is checked below against the caller's clock.
        validation.validate_exp = false;
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &keys.decoding, &validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        if token_data.claims.exp <= now.timestamp() {
            return Err(AuthError::TokenExpired);
        }

        let user_id = Uuid::parse_str(&token_data.claims.sub)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(TokenClaims {
            user_id,
            is_admin: token_data.claims.is_admin,
            issued_at: token_data.claims.iat,
            exp: token_data.claims.exp,
        })
    }

    fn expiration_seconds(&self) -> i64 {
        self.config.expiration_hours * 3600
    }
}
