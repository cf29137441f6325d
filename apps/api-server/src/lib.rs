//! # Quill API Server
//!
//! HTTP surface of the blogging backend: routes, extractors, error mapping and wiring.
//! The binary in `main.rs` only reads configuration and starts the server.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod telemetry;
