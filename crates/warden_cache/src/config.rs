//! Connection settings for the remote hash store.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Configuration for [`RedisHashStore`](crate::RedisHashStore).
///
/// ```toml
/// [store]
/// host = "127.0.0.1"
/// port = 6379
/// database = 0
/// tls = false
/// pool_size = 20
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default)]
pub struct HashStoreConfig {
    /// Server host name or address
    #[serde(default = "default_host")]
    host: String,

    /// Server port
    #[serde(default = "default_port")]
    port: u16,

    /// Password for `AUTH`, if the server requires one
    #[serde(default)]
    password: Option<String>,

    /// Logical database index
    #[serde(default)]
    database: i64,

    /// Connect over TLS (`rediss://`)
    #[serde(default)]
    tls: bool,

    /// Maximum commands in flight at once (0 = unbounded)
    #[serde(default = "default_pool_size")]
    pool_size: usize,

    /// Connection timeout (milliseconds)
    #[serde(default = "default_connect_timeout_ms")]
    connect_timeout_ms: u64,

    /// Per-command response timeout (milliseconds)
    #[serde(default = "default_response_timeout_ms")]
    response_timeout_ms: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    6379
}

fn default_pool_size() -> usize {
    20
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_response_timeout_ms() -> u64 {
    5_000
}

impl Default for HashStoreConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            password: None,
            database: 0,
            tls: false,
            pool_size: default_pool_size(),
            connect_timeout_ms: default_connect_timeout_ms(),
            response_timeout_ms: default_response_timeout_ms(),
        }
    }
}

impl HashStoreConfig {
    /// Connection URL without credentials, for logging and for the client.
    pub fn url(&self) -> String {
        let scheme = if self.tls { "rediss" } else { "redis" };
        format!("{}://{}:{}/{}", scheme, self.host, self.port, self.database)
    }
}
