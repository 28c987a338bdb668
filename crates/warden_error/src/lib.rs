//! Error types for the Warden data-access layer.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! Absence is never an error here: cache and store lookups return `Option`.
//! The only "not found" error is [`CacheErrorKind::KeyNotFound`], raised when a
//! caller removes (or reads without a default) a key that is not cached.
//!
//! # Examples
//!
//! ```
//! use warden_error::{HttpError, HttpErrorKind, WardenResult};
//!
//! fn close_client() -> WardenResult<()> {
//!     Err(HttpError::new(HttpErrorKind::Shutdown("socket already closed".into())))?
//! }
//!
//! assert!(close_client().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cache;
mod config;
mod error;
mod http;
mod retry;
mod store;

pub use cache::{CacheError, CacheErrorKind, CacheResult};
pub use config::{ConfigError, ConfigErrorKind};
pub use error::{WardenError, WardenErrorKind, WardenResult};
pub use http::{ErrorPayload, HttpError, HttpErrorKind, HttpResult};
pub use retry::{RetryDecision, RetryableError};
pub use store::{StoreError, StoreErrorKind, StoreResult};
