//! Registration, login and token-to-identity resolution.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{Principal, User, mask_email};
use crate::error::{DomainError, RepoError};
use crate::ports::{AuthError, PasswordService, TokenService, UserRepository};

use super::required;

const ALL_FIELDS_REQUIRED: &str = "All fields are required";
const EMAIL_IN_USE: &str = "Email already in use";

/// Registration input as submitted; presence is checked by [`AuthService::register`].
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_admin: Option<bool>,
}

/// Login input as submitted.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: Principal,
    pub expires_in: i64,
}

/// Authentication service: owns the credential rules and token issuance.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    /// Register a new account. The admin flag is taken from the caller as-is.
    pub async fn register(&self, registration: Registration) -> Result<Principal, DomainError> {
        let (Some(username), Some(email), Some(password)) = (
            required(registration.username),
            required(registration.email),
            required(registration.password),
        ) else {
            return Err(DomainError::Validation(ALL_FIELDS_REQUIRED.to_string()));
        };

        if self.users.find_by_email(&email).await?.is_some() {
            tracing::warn!(user_email = %mask_email(&email), "Registration for existing email");
            return Err(DomainError::Duplicate(EMAIL_IN_USE.to_string()));
        }

        let password_hash = self.passwords.hash(&password)?;
        let is_admin = registration.is_admin.unwrap_or(false);
        if is_admin {
            tracing::warn!(user_email = %mask_email(&email), "Self-registration with admin flag");
        }

        let user = User::new(username, email, password_hash, is_admin);
        let saved = self.users.insert(user).await.map_err(|e| match e {
            // Lost a race with a concurrent registration for the same email.
            RepoError::Constraint(_) => DomainError::Duplicate(EMAIL_IN_USE.to_string()),
            other => other.into(),
        })?;

        tracing::info!(user_id = %saved.id, "User registered");
        Ok(Principal::from(saved))
    }

    /// Verify credentials and issue a session token.
    pub async fn login(&self, credentials: Credentials) -> Result<Session, DomainError> {
        let (Some(email), Some(password)) =
            (required(credentials.email), required(credentials.password))
        else {
            return Err(DomainError::Validation(ALL_FIELDS_REQUIRED.to_string()));
        };

        let Some(user) = self.users.find_by_email(&email).await? else {
            tracing::info!(user_email = %mask_email(&email), "Login for unknown email");
            return Err(AuthError::UserNotFound.into());
        };

        if !self.passwords.verify(&password, &user.password_hash)? {
            tracing::info!(user_id = %user.id, "Login with wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = self
            .tokens
            .generate_token(user.id, user.is_admin)
            .inspect_err(|e| {
                if matches!(e, AuthError::MissingSecret) {
                    tracing::error!("JWT_SECRET is not configured; cannot issue tokens");
                }
            })?;

        tracing::info!(user_id = %user.id, "Login successful");
        Ok(Session {
            token,
            user: Principal::from(user),
            expires_in: self.tokens.expiration_seconds(),
        })
    }

    /// Resolve a bearer token to the current user record.
    pub async fn authenticate(&self, token: &str) -> Result<Principal, DomainError> {
        self.authenticate_at(token, Utc::now()).await
    }

    /// [`Self::authenticate`] with an explicit notion of "now".
    pub async fn authenticate_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Principal, DomainError> {
        let claims = self.tokens.validate_token_at(token, now).inspect_err(|e| {
            tracing::debug!(reason = %e, "Rejected session token");
        })?;

        let user = self
            .users
            .find_by_id(claims.user_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!(user_id = %claims.user_id, "Token for a user that no longer exists");
                AuthError::UserNotFound
            })?;

        Ok(Principal::from(user))
    }
}
