//! Pure retry bookkeeping, separate from sleeping and I/O.

use crate::BackoffConfig;
use std::time::Duration;
use tokio_retry2::strategy::ExponentialFactorBackoff;
use warden_error::RetryDecision;

/// Lifecycle of one controlled operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum BackoffState {
    /// Nothing attempted yet.
    Idle,
    /// An attempt is running.
    Attempting,
    /// Waiting before the next attempt.
    Retrying,
    /// An attempt returned a value.
    Succeeded,
    /// Gave up.
    Failed,
}

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Wait out a server cooldown, then try again.
    Cooldown(Duration),
    /// Wait the controller's own delay, then try again.
    Backoff(Duration),
    /// The error cannot be retried.
    GiveUp,
    /// No attempts left.
    Exhausted,
}

/// Attempt counter and delay schedule for one operation.
///
/// The own schedule is `base_delay * multiplier^n`, capped at `max_delay`. It
/// only advances on transient failures.
#[derive(Debug, Clone)]
pub struct RetryState {
    attempt: u32,
    schedule: ExponentialFactorBackoff,
    current_delay: Duration,
    state: BackoffState,
    max_attempts: u32,
    max_delay: Duration,
}

impl RetryState {
    /// Fresh state at the start of the schedule.
    pub fn new(config: &BackoffConfig) -> Self {
        let max_delay = config.max_delay();
        // NaN and values below 1 would shrink the schedule.
        let multiplier = config.multiplier().max(1.0);
        let mut schedule =
            ExponentialFactorBackoff::from_millis(*config.base_delay_ms(), multiplier)
                .max_delay(max_delay);
        let current_delay = schedule.next().unwrap_or(max_delay);

        Self {
            attempt: 0,
            schedule,
            current_delay,
            state: BackoffState::Idle,
            max_attempts: (*config.max_attempts()).max(1),
            max_delay,
        }
    }

    /// Attempts started so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Delay the next transient failure will wait.
    pub fn current_delay(&self) -> Duration {
        self.current_delay
    }

    /// Current lifecycle state.
    pub fn state(&self) -> BackoffState {
        self.state
    }

    /// Mark the start of an attempt.
    pub fn begin_attempt(&mut self) {
        self.attempt += 1;
        self.state = BackoffState::Attempting;
    }

    /// Mark the running attempt as successful.
    pub fn succeed(&mut self) {
        self.state = BackoffState::Succeeded;
    }

    /// Mark the operation as abandoned without a result.
    pub fn fail(&mut self) {
        self.state = BackoffState::Failed;
    }

    /// Decide the next step after the running attempt failed.
    ///
    /// Server cooldowns are honored exactly and leave the own schedule where
    /// it was. Transient failures wait the current delay and then grow it,
    /// so the own schedule never shrinks.
    pub fn on_error(&mut self, decision: RetryDecision) -> Step {
        if decision == RetryDecision::Permanent {
            self.fail();
            return Step::GiveUp;
        }
        if self.attempt >= self.max_attempts {
            self.fail();
            return Step::Exhausted;
        }

        self.state = BackoffState::Retrying;
        match decision {
            RetryDecision::RateLimited(cooldown) => Step::Cooldown(cooldown),
            _ => {
                let delay = self.current_delay;
                self.current_delay = self
                    .schedule
                    .next()
                    .unwrap_or(self.max_delay)
                    .max(delay);
                Step::Backoff(delay)
            }
        }
    }
}
