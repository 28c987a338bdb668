//! Cached reads and writes for Warden, independent of where the data lives.
//!
//! This crate provides two families of caches:
//!
//! - [`KeyedCache`]: an unbounded, in-process map for API responses and other
//!   values that are cheap to rebuild.
//! - [`HashStore`]: a `hash → field → value` store, implemented over Redis by
//!   [`RedisHashStore`] and in memory by [`MemoryHashStore`], for settings that
//!   are not worth a database query (prefixes, mute roles, log channels).
//!
//! Lookups of missing data return `None` or a caller-supplied default. Errors
//! are reserved for conditions a caller cannot treat as a normal outcome.

#![warn(missing_docs)]

mod config;
mod hash;
mod keyed;
mod memory;
mod remote;

pub use config::{HashStoreConfig, HashStoreConfigBuilder};
pub use hash::HashStore;
pub use keyed::{CacheView, KeyedCache, KeysView, ValuesView};
pub use memory::MemoryHashStore;
pub use remote::RedisHashStore;
