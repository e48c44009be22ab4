//! Common utilities and shared types for markethall.
//!
//! This crate provides foundational components used across all markethall crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Pagination**: Shared page-request parsing and response envelope via
//!   [`PageRequest`] and [`Pagination`]
//!
//! # Example
//!
//! ```no_run
//! use markethall_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod pagination;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use pagination::{PageRequest, Pagination, SortDir};
