//! # Quill Core
//!
//! The domain layer of the Quill blogging backend.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, the ports adapters must implement, the owner-or-admin policy, and the
//! application services the HTTP layer drives.

pub mod domain;
pub mod error;
pub mod policy;
pub mod ports;
pub mod services;

pub use error::DomainError;
