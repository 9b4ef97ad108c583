//! Error types for the kbbq bot.
//!
//! This crate provides the foundation error types used throughout the kbbq workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! The top-level [`KbbqError`] mirrors the failure taxonomy the engines act on:
//! infrastructure failures ([`DatabaseError`]) propagate, expected absence and
//! permission failures ([`PlatformError`]) are classified by the caller, and
//! malformed templates ([`TemplateError`]) become user-facing validation replies.
//!
//! # Examples
//!
//! ```
//! use kbbq_error::{KbbqResult, ConfigError};
//!
//! fn load() -> KbbqResult<u64> {
//!     Err(ConfigError::new("reward interval must be positive"))?
//! }
//!
//! assert!(load().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod database;
mod error;
mod platform;
mod template;

pub use config::ConfigError;
pub use database::{DatabaseError, DatabaseErrorKind};
pub use error::{KbbqError, KbbqErrorKind, KbbqResult};
pub use platform::{PlatformError, PlatformErrorKind, PlatformResult};
pub use template::{TemplateError, TemplateErrorKind};
