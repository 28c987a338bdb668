//! Outcome of a controlled operation that never succeeded.

use std::fmt;

/// Why a [`BackoffController`](crate::BackoffController) stopped retrying.
///
/// Carries the operation's own error so callers can still inspect its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum BackoffError<E> {
    /// The error was not retryable.
    Permanent(E),
    /// Every attempt failed.
    Exhausted {
        /// Attempts made
        attempts: u32,
        /// Error of the last attempt
        source: E,
    },
    /// The cancellation token fired.
    Cancelled {
        /// Attempts made before cancellation
        attempts: u32,
        /// Error of the last attempt, if any ran
        last: Option<E>,
    },
}

impl<E> BackoffError<E> {
    /// Error of the last attempt, if one ran.
    pub fn last_error(&self) -> Option<&E> {
        match self {
            BackoffError::Permanent(e) => Some(e),
            BackoffError::Exhausted { source, .. } => Some(source),
            BackoffError::Cancelled { last, .. } => last.as_ref(),
        }
    }

    /// Consume into the last attempt's error.
    pub fn into_last_error(self) -> Option<E> {
        match self {
            BackoffError::Permanent(e) => Some(e),
            BackoffError::Exhausted { source, .. } => Some(source),
            BackoffError::Cancelled { last, .. } => last,
        }
    }

    /// Returns true if retrying stopped because of cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, BackoffError::Cancelled { .. })
    }
}

impl<E: fmt::Display> fmt::Display for BackoffError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackoffError::Permanent(e) => write!(f, "Permanent failure: {}", e),
            BackoffError::Exhausted { attempts, source } => {
                write!(f, "Gave up after {} attempts: {}", attempts, source)
            }
            BackoffError::Cancelled { attempts, last } => match last {
                Some(e) => write!(f, "Cancelled after {} attempts: {}", attempts, e),
                None => write!(f, "Cancelled before the first attempt"),
            },
        }
    }
}

impl<E> std::error::Error for BackoffError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.last_error().map(|e| e as &(dyn std::error::Error + 'static))
    }
}
