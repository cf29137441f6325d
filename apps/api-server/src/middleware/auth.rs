//! Authentication extractors.
//!
//! [`Identity`] is the access-control gate: it reads the bearer token, validates it and
//! re-loads the user from the credential store, so every request sees the current record.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures::future::LocalBoxFuture;

use quill_core::domain::Principal;
use quill_core::policy::require_admin;
use quill_core::ports::AuthError;

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Authenticated user identity extractor.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.0.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity(pub Principal);

/// Extract the token from `Authorization: Bearer <token>`.
fn bearer_token(req: &HttpRequest) -> Result<String, AppError> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized(AuthError::MissingAuth.to_string()))?;

    let token = header
        .to_str()
        .ok()
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization header".to_string()))?;

    Ok(token.to_string())
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = bearer_token(req);

        Box::pin(async move {
            let Some(state) = state else {
                tracing::error!("AppState not found in app data");
                return Err(AppError::Internal("application state missing".to_string()));
            };

            let principal = state.auth.authenticate(&token?).await?;
            Ok(Identity(principal))
        })
    }
}

/// Identity extractor that additionally requires the admin flag.
#[derive(Debug, Clone)]
pub struct AdminIdentity(pub Principal);

impl FromRequest for AdminIdentity {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let identity = Identity::from_request(req, payload);

        Box::pin(async move {
            let Identity(principal) = identity.await?;
            require_admin(&principal)?;
            Ok(AdminIdentity(principal))
        })
    }
}
