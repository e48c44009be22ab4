//! Core business logic for markethall.

pub mod moderation;
pub mod services;

pub use services::*;

/// Generate a unique ID using ULID.
#[must_use]
pub fn generate_id() -> String {
    markethall_common::IdGenerator::new().generate()
}
