//! CORS policy built from the configured origin allow-list.

use actix_cors::Cors;
use actix_web::http::header;

/// Build the CORS middleware for the given allow-list.
///
/// A wildcard entry is ignored: credentials are allowed, which rules out `*`.
pub fn cors(allowed_origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .supports_credentials()
        .max_age(3600);

    for origin in allowed_origins {
        if origin == "*" {
            tracing::warn!("Ignoring wildcard CORS origin");
            continue;
        }
        cors = cors.allowed_origin(origin);
    }

    cors
}
