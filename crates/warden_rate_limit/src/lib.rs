//! Backoff control for calls to rate-limited services.
//!
//! [`BackoffController`] wraps any async operation whose error implements
//! [`RetryableError`](warden_error::RetryableError). Server cooldowns are
//! honored exactly; transient failures use a growing delay of the
//! controller's own; everything else fails fast.

mod config;
mod controller;
mod error;
mod state;

pub use config::{BackoffConfig, BackoffConfigBuilder};
pub use controller::BackoffController;
pub use error::BackoffError;
pub use state::{BackoffState, RetryState, Step};
pub use tokio_util::sync::CancellationToken;
