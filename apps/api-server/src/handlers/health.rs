//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

/// Health check endpoint - returns server status.
///
/// GET /health
///
/// Reports `degraded` with a 503 when a configured database does not answer.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let healthy = database_reachable(&state).await;

    let response = HealthResponse {
        status: if healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    if healthy {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

#[cfg(feature = "postgres")]
async fn database_reachable(state: &AppState) -> bool {
    match &state.db {
        Some(db) => match db.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Database ping failed");
                false
            }
        },
        None => true,
    }
}

#[cfg(not(feature = "postgres"))]
async fn database_reachable(_state: &AppState) -> bool {
    true
}
