//! Error types for the Mentora back office.
//!
//! This crate provides the foundation error types used throughout the Mentora
//! workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error
//! handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use mentora_error::{MentoraResult, ConfigError};
//!
//! fn load_setting() -> MentoraResult<String> {
//!     Err(ConfigError::new("DATABASE_URL not set"))?
//! }
//!
//! match load_setting() {
//!     Ok(value) => println!("Got: {}", value),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
#[cfg(feature = "database")]
mod database;
mod error;
mod validation;

pub use config::ConfigError;
#[cfg(feature = "database")]
pub use database::{DatabaseError, DatabaseErrorKind};
pub use error::{MentoraError, MentoraErrorKind, MentoraResult};
pub use validation::ValidationError;
