//! Request extractors and cross-cutting HTTP concerns.

pub mod auth;
pub mod cors;
pub mod error;

pub use auth::{AdminIdentity, Identity};
pub use error::{AppError, AppResult};
