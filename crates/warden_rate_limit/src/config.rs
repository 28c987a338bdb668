//! Retry schedule configuration.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a [`BackoffController`](crate::BackoffController) spaces its attempts.
///
/// The controller's own schedule starts at `base_delay_ms` and is multiplied
/// after every transient failure, capped at `max_delay_ms`. Rate-limit
/// cooldowns from the server bypass this schedule entirely.
///
/// ```toml
/// [backoff]
/// base_delay_ms = 1000
/// multiplier = 2.0
/// max_delay_ms = 64000
/// max_attempts = 5
/// jitter = false
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default)]
pub struct BackoffConfig {
    /// First delay of the controller's own schedule (milliseconds)
    #[serde(default = "default_base_delay_ms")]
    base_delay_ms: u64,

    /// Growth factor applied after each transient failure (values below 1 act as 1)
    #[serde(default = "default_multiplier")]
    multiplier: f64,

    /// Upper bound for the controller's own delays (milliseconds)
    #[serde(default = "default_max_delay_ms")]
    max_delay_ms: u64,

    /// Total attempts, including the first one
    #[serde(default = "default_max_attempts")]
    max_attempts: u32,

    /// Randomize the controller's own delays to between half and one and a
    /// half times their value, never past `max_delay_ms`
    #[serde(default)]
    jitter: bool,
}

fn default_base_delay_ms() -> u64 {
    1_000
}

fn default_multiplier() -> f64 {
    2.0
}

fn default_max_delay_ms() -> u64 {
    64_000
}

fn default_max_attempts() -> u32 {
    5
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: default_base_delay_ms(),
            multiplier: default_multiplier(),
            max_delay_ms: default_max_delay_ms(),
            max_attempts: default_max_attempts(),
            jitter: false,
        }
    }
}

impl BackoffConfig {
    /// First delay of the own schedule.
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// Cap of the own schedule.
    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms.max(self.base_delay_ms))
    }
}
