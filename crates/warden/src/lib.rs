//! Resilient data access for a moderation chat bot.
//!
//! - [`KeyedCache`]: in-process cache of API responses
//! - [`HashStore`]: `hash → field → value` settings store, over Redis
//!   ([`RedisHashStore`]) or in memory ([`MemoryHashStore`])
//! - [`HttpGate`]: one shared HTTP client, one request at a time, with typed
//!   status errors
//! - [`BackoffController`]: retries rate-limited and transient failures
//!
//! # Example
//!
//! ```no_run
//! use warden::{BackoffController, HttpGate, WardenConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! warden::init_tracing().ok();
//! let config = WardenConfig::load()?;
//! let gate = HttpGate::new(config.http().clone());
//! let backoff = BackoffController::new(config.backoff().clone());
//!
//! let roles = backoff
//!     .run(|| gate.get("https://api.example.com/guilds/1/roles"))
//!     .await?;
//! gate.close().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod telemetry;

pub use config::WardenConfig;
pub use telemetry::{init_tracing, init_tracing_json};

pub use warden_cache::{
    CacheView, HashStore, HashStoreConfig, HashStoreConfigBuilder, KeyedCache, KeysView,
    MemoryHashStore, RedisHashStore, ValuesView,
};
pub use warden_error::{
    CacheError, CacheErrorKind, CacheResult, ConfigError, ConfigErrorKind, ErrorPayload,
    HttpError, HttpErrorKind, HttpResult, RetryDecision, RetryableError, StoreError,
    StoreErrorKind, StoreResult, WardenError, WardenErrorKind, WardenResult,
};
pub use warden_net::{
    Connect, HttpClient, HttpGate, HttpGateConfig, HttpGateConfigBuilder, Method, PendingRequest,
    RawResponse, ReqwestClient, ReqwestConnector,
};
pub use warden_rate_limit::{
    BackoffConfig, BackoffConfigBuilder, BackoffController, BackoffError, BackoffState,
    CancellationToken, RetryState,
};
