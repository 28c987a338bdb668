//! Retry classification shared by every error that may be retried.

use crate::{HttpError, HttpErrorKind, StoreError, StoreErrorKind};
use std::time::Duration;

/// What a retry loop should do after an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// The server asked for a cooldown; wait exactly this long.
    RateLimited(Duration),
    /// Transient failure; wait the controller's own delay.
    Transient,
    /// Do not retry.
    Permanent,
}

/// Trait for errors that support retry logic.
///
/// # Examples
///
/// ```
/// use warden_error::{ErrorPayload, HttpError, HttpErrorKind, RetryDecision, RetryableError};
///
/// let err = HttpError::new(HttpErrorKind::InternalError {
///     status: 502,
///     payload: ErrorPayload::default(),
/// });
/// assert_eq!(err.retry_decision(), RetryDecision::Transient);
/// assert!(err.is_retryable());
/// ```
pub trait RetryableError {
    /// Classify this error for a retry loop.
    fn retry_decision(&self) -> RetryDecision;

    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool {
        !matches!(self.retry_decision(), RetryDecision::Permanent)
    }
}

impl RetryableError for HttpError {
    fn retry_decision(&self) -> RetryDecision {
        match &self.kind {
            HttpErrorKind::InternalError { .. } => RetryDecision::Transient,
            HttpErrorKind::Status {
                status: 429,
                payload,
            } => payload
                .retry_after()
                .map(RetryDecision::RateLimited)
                .unwrap_or(RetryDecision::Transient),
            _ => RetryDecision::Permanent,
        }
    }
}

impl RetryableError for StoreError {
    fn retry_decision(&self) -> RetryDecision {
        match self.kind {
            StoreErrorKind::Unavailable(_) => RetryDecision::Transient,
            _ => RetryDecision::Permanent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorPayload;
    use std::collections::BTreeMap;

    fn status(status: u16, headers: &[(&str, &str)]) -> HttpError {
        let headers: BTreeMap<String, String> = headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let payload = ErrorPayload::new("https://api.test/guilds/1", headers, None);
        HttpError::new(HttpErrorKind::Status { status, payload })
    }

    #[test]
    fn test_rate_limit_reads_retry_after_header() {
        let err = status(429, &[("Retry-After", "2.5")]);
        assert_eq!(
            err.retry_decision(),
            RetryDecision::RateLimited(Duration::from_millis(2500))
        );
    }

    #[test]
    fn test_rate_limit_reads_discord_reset_after() {
        let err = status(429, &[("x-ratelimit-reset-after", "1")]);
        assert_eq!(
            err.retry_decision(),
            RetryDecision::RateLimited(Duration::from_secs(1))
        );
    }

    #[test]
    fn test_rate_limit_without_hint_is_transient() {
        assert_eq!(status(429, &[]).retry_decision(), RetryDecision::Transient);
    }

    #[test]
    fn test_client_errors_are_permanent() {
        let payload = ErrorPayload::default();
        for kind in [
            HttpErrorKind::BadRequest(payload.clone()),
            HttpErrorKind::Forbidden(payload.clone()),
            HttpErrorKind::NotFound(payload),
            HttpErrorKind::TypeMismatch {
                key: "a".into(),
                found: "array".into(),
            },
        ] {
            assert!(!HttpError::new(kind).is_retryable());
        }
        assert!(!status(418, &[]).is_retryable());
    }

    #[test]
    fn test_store_unavailable_is_transient() {
        let err = StoreError::new(StoreErrorKind::Unavailable("refused".into()));
        assert_eq!(err.retry_decision(), RetryDecision::Transient);
        let err = StoreError::new(StoreErrorKind::Codec("bad json".into()));
        assert_eq!(err.retry_decision(), RetryDecision::Permanent);
    }

    #[test]
    fn test_retry_after_from_body() {
        let payload = ErrorPayload::new(
            "https://api.test",
            BTreeMap::new(),
            Some(serde_json::json!({"message": "You are being rate limited.", "retry_after": 0.75})),
        );
        assert_eq!(payload.retry_after(), Some(Duration::from_millis(750)));
    }
}
