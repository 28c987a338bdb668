//! HTTP client settings.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Configuration for the client behind an [`HttpGate`](crate::HttpGate).
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
pub struct HttpGateConfig {
    /// Whole-request timeout including reading the body (milliseconds, 0 = none)
    #[serde(default = "default_timeout_ms")]
    timeout_ms: u64,

    /// `User-Agent` header sent with every request
    #[serde(default = "default_user_agent")]
    user_agent: String,
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_user_agent() -> String {
    format!("warden/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for HttpGateConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}
