//! Registration and login handlers.

use actix_web::{HttpResponse, web};

use quill_core::services::{Credentials, Registration};
use quill_shared::MessageResponse;
use quill_shared::dto::{LoginRequest, LoginResponse, RegisterUserRequest};

use crate::middleware::AppResult;
use crate::state::AppState;

/// POST /users/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    state
        .auth
        .register(Registration {
            username: req.username,
            email: req.email,
            password: req.password,
            is_admin: req.is_admin,
        })
        .await?;

    Ok(HttpResponse::Created().json(MessageResponse::new("User registered successfully")))
}

/// POST /users/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let session = state
        .auth
        .login(Credentials {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        token: session.token,
        id: session.user.id,
        username: session.user.username,
        email: session.user.email,
        is_admin: session.user.is_admin,
        expires_in: session.expires_in,
    }))
}
