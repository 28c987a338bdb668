//! Retry loop around a fallible async operation.

use crate::state::{RetryState, Step};
use crate::{BackoffConfig, BackoffError};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};
use warden_error::RetryableError;

/// Re-runs an operation until it succeeds, fails permanently, runs out of
/// attempts, or is cancelled.
///
/// A rate-limit error makes the controller wait exactly the cooldown the
/// server asked for. A transient error makes it wait its own delay, which
/// grows after each use up to the configured cap. Anything else is returned
/// on the first occurrence.
///
/// # Example
///
/// ```no_run
/// use warden_net::{HttpGate, HttpGateConfig};
/// use warden_rate_limit::{BackoffConfig, BackoffController};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let gate = HttpGate::new(HttpGateConfig::default());
/// let backoff = BackoffController::new(BackoffConfig::default());
/// let guild = backoff
///     .run(|| gate.get("https://api.example.com/guilds/1"))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct BackoffController {
    config: BackoffConfig,
    cancel: Option<CancellationToken>,
}

impl BackoffController {
    /// Create a controller that retries until success or exhaustion.
    pub fn new(config: BackoffConfig) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    /// Stop waiting and return [`BackoffError::Cancelled`] once `token` fires.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Retry settings in use.
    pub fn config(&self) -> &BackoffConfig {
        &self.config
    }

    /// Run `operation` under the retry policy.
    ///
    /// # Errors
    ///
    /// - [`BackoffError::Permanent`] for a non-retryable error
    /// - [`BackoffError::Exhausted`] when `max_attempts` attempts failed
    /// - [`BackoffError::Cancelled`] when the token fired
    #[instrument(skip_all, fields(max_attempts = self.config.max_attempts()))]
    pub async fn run<F, Fut, T, E>(&self, mut operation: F) -> Result<T, BackoffError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: RetryableError + Display,
    {
        let mut state = RetryState::new(&self.config);

        loop {
            if self.is_cancelled() {
                state.fail();
                return Err(BackoffError::Cancelled {
                    attempts: state.attempt(),
                    last: None,
                });
            }

            state.begin_attempt();
            let error = match operation().await {
                Ok(value) => {
                    state.succeed();
                    debug!(attempt = state.attempt(), "Operation succeeded");
                    return Ok(value);
                }
                Err(e) => e,
            };

            let delay = match state.on_error(error.retry_decision()) {
                Step::GiveUp => {
                    warn!(attempt = state.attempt(), error = %error, "Permanent error, failing immediately");
                    return Err(BackoffError::Permanent(error));
                }
                Step::Exhausted => {
                    warn!(attempts = state.attempt(), error = %error, "Retries exhausted");
                    return Err(BackoffError::Exhausted {
                        attempts: state.attempt(),
                        source: error,
                    });
                }
                Step::Cooldown(cooldown) => {
                    warn!(
                        attempt = state.attempt(),
                        cooldown_ms = cooldown.as_millis() as u64,
                        "Rate limited, waiting out server cooldown"
                    );
                    cooldown
                }
                Step::Backoff(delay) => {
                    let delay = self.spread(delay);
                    warn!(
                        attempt = state.attempt(),
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Transient error, will retry"
                    );
                    delay
                }
            };

            if !self.sleep(delay).await {
                state.fail();
                debug!(attempts = state.attempt(), "Retry cancelled");
                return Err(BackoffError::Cancelled {
                    attempts: state.attempt(),
                    last: Some(error),
                });
            }
        }
    }

    fn spread(&self, delay: Duration) -> Duration {
        if *self.config.jitter() {
            jittered(delay, self.config.max_delay())
        } else {
            delay
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    /// Sleep for `delay`; false if cancelled first.
    async fn sleep(&self, delay: Duration) -> bool {
        match &self.cancel {
            Some(token) => tokio::select! {
                _ = token.cancelled() => false,
                _ = tokio::time::sleep(delay) => true,
            },
            None => {
                tokio::time::sleep(delay).await;
                true
            }
        }
    }
}

/// Randomize an own-schedule delay to `[delay / 2, delay * 1.5)`, never past `cap`.
fn jittered(delay: Duration, cap: Duration) -> Duration {
    tokio_retry2::strategy::jitter(delay).min(cap)
}
