//! Application configuration, read once at startup.
//!
//! Nothing else in the server looks at the process environment: the resulting [`AppConfig`]
//! is handed by reference to whatever needs it.

use std::env;

use quill_infra::{DatabaseConfig, JwtConfig};

use crate::telemetry::TelemetryConfig;

const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost:3000", "http://localhost:4000"];

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    /// Apply pending schema migrations before serving.
    pub migrate_on_start: bool,
    pub jwt: JwtConfig,
    pub cors_origins: Vec<String>,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parse_or = |key: &str, default: u32| {
            lookup(key)
                .and_then(|s| s.parse().ok())
                .unwrap_or(default)
        };

        let database = lookup("DATABASE_URL")
            .filter(|url| !url.is_empty())
            .map(|url| DatabaseConfig {
                url,
                max_connections: parse_or("DB_MAX_CONNECTIONS", 20),
                min_connections: parse_or("DB_MIN_CONNECTIONS", 2),
            });

        let jwt = JwtConfig {
            secret: lookup("JWT_SECRET").filter(|s| !s.is_empty()),
            issuer: lookup("JWT_ISSUER").unwrap_or_else(|| JwtConfig::default().issuer),
            ..JwtConfig::default()
        };

        let cors_origins = match lookup("CORS_ORIGINS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect(),
            None => DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(4000),
            database,
            migrate_on_start: lookup("RUN_MIGRATIONS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            jwt,
            cors_origins,
            telemetry: TelemetryConfig::from_lookup(&lookup),
        }
    }
}
