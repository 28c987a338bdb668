//! Tests for the backoff controller, on a paused clock.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use warden_error::{ErrorPayload, HttpError, HttpErrorKind, RetryDecision, RetryableError};
use warden_rate_limit::{
    BackoffConfig, BackoffConfigBuilder, BackoffController, BackoffError, CancellationToken,
};

#[derive(Debug, Clone, PartialEq)]
enum Upstream {
    RateLimited(Duration),
    Unavailable,
    Forbidden,
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl RetryableError for Upstream {
    fn retry_decision(&self) -> RetryDecision {
        match self {
            Upstream::RateLimited(d) => RetryDecision::RateLimited(*d),
            Upstream::Unavailable => RetryDecision::Transient,
            Upstream::Forbidden => RetryDecision::Permanent,
        }
    }
}

/// Replays a script of results and records when each attempt started.
#[derive(Clone)]
struct Script {
    results: Arc<Mutex<VecDeque<Result<&'static str, Upstream>>>>,
    started: Arc<Mutex<Vec<Instant>>>,
}

impl Script {
    fn new(results: Vec<Result<&'static str, Upstream>>) -> Self {
        Self {
            results: Arc::new(Mutex::new(results.into())),
            started: Arc::new(Mutex::new(Vec::new())),
        }
    }

    async fn call(&self) -> Result<&'static str, Upstream> {
        self.started.lock().unwrap().push(Instant::now());
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(Upstream::Unavailable))
    }

    fn attempts(&self) -> usize {
        self.started.lock().unwrap().len()
    }

    fn gaps(&self) -> Vec<Duration> {
        let started = self.started.lock().unwrap();
        started.windows(2).map(|w| w[1] - w[0]).collect()
    }
}

/// Paused-clock sleeps land on the next millisecond tick at the latest.
fn assert_waited(actual: &[Duration], expected: &[Duration]) {
    assert_eq!(actual.len(), expected.len(), "{:?} vs {:?}", actual, expected);
    for (a, e) in actual.iter().zip(expected) {
        assert!(
            *a >= *e && *a < *e + Duration::from_millis(5),
            "waited {:?}, expected {:?}",
            a,
            e
        );
    }
}

fn config() -> BackoffConfig {
    BackoffConfigBuilder::default()
        .base_delay_ms(100)
        .multiplier(2.0)
        .max_delay_ms(1_000)
        .max_attempts(5)
        .build()
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_success_on_first_attempt_does_not_wait() {
    let script = Script::new(vec![Ok("guild")]);
    let start = Instant::now();

    let value = BackoffController::new(config())
        .run(|| script.call())
        .await
        .unwrap();

    assert_eq!(value, "guild");
    assert_eq!(script.attempts(), 1);
    assert_waited(&[start.elapsed()], &[Duration::ZERO]);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_waits_exactly_the_cooldown() {
    let script = Script::new(vec![Err(Upstream::RateLimited(Duration::from_secs(3))), Ok("ok")]);

    let value = BackoffController::new(config())
        .run(|| script.call())
        .await
        .unwrap();

    assert_eq!(value, "ok");
    assert_waited(&script.gaps(), &[Duration::from_secs(3)]);
}

#[tokio::test(start_paused = true)]
async fn test_cooldown_does_not_advance_own_schedule() {
    let script = Script::new(vec![
        Err(Upstream::Unavailable),
        Err(Upstream::RateLimited(Duration::from_millis(2_500))),
        Err(Upstream::Unavailable),
        Ok("ok"),
    ]);

    BackoffController::new(config())
        .run(|| script.call())
        .await
        .unwrap();

    assert_waited(
        &script.gaps(),
        &[
            Duration::from_millis(100),
            Duration::from_millis(2_500),
            Duration::from_millis(200),
        ],
    );
}

#[tokio::test(start_paused = true)]
async fn test_permanent_error_is_not_retried() {
    let script = Script::new(vec![Err(Upstream::Forbidden), Ok("never")]);

    let err = BackoffController::new(config())
        .run(|| script.call())
        .await
        .unwrap_err();

    assert_eq!(err, BackoffError::Permanent(Upstream::Forbidden));
    assert_eq!(script.attempts(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_transient_errors_back_off_then_exhaust() {
    let script = Script::new(vec![]);

    let err = BackoffController::new(config())
        .run(|| script.call())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        BackoffError::Exhausted {
            attempts: 5,
            source: Upstream::Unavailable
        }
    );
    assert_eq!(script.attempts(), 5);
    assert_waited(
        &script.gaps(),
        &[
            Duration::from_millis(100),
            Duration::from_millis(200),
            Duration::from_millis(400),
            Duration::from_millis(800),
        ],
    );
}

#[tokio::test(start_paused = true)]
async fn test_delays_never_exceed_cap() {
    let script = Script::new(vec![]);
    let config = config().with_max_attempts(8).with_max_delay_ms(300);

    let _ = BackoffController::new(config).run(|| script.call()).await;

    let gaps = script.gaps();
    assert_eq!(gaps.len(), 7);
    assert!(gaps.iter().all(|gap| *gap < Duration::from_millis(305)));
    assert!(gaps[2..].iter().all(|gap| *gap >= Duration::from_millis(300)));
}

#[tokio::test(start_paused = true)]
async fn test_jittered_delays_respect_cap() {
    let script = Script::new(vec![]);
    // Base equals the cap, so any upward jitter would cross it.
    let config = config()
        .with_base_delay_ms(200)
        .with_max_delay_ms(200)
        .with_max_attempts(6)
        .with_jitter(true);

    let _ = BackoffController::new(config).run(|| script.call()).await;

    let gaps = script.gaps();
    assert_eq!(gaps.len(), 5);
    for gap in gaps {
        assert!(gap >= Duration::from_millis(100), "{:?} below half the base delay", gap);
        assert!(gap < Duration::from_millis(205), "{:?} exceeds the cap", gap);
    }
}

#[tokio::test(start_paused = true)]
async fn test_unbounded_multiplier_waits_at_most_the_cap() {
    let script = Script::new(vec![]);
    let config = config().with_multiplier(f64::INFINITY).with_max_attempts(4);

    let err = BackoffController::new(config)
        .run(|| script.call())
        .await
        .unwrap_err();

    assert!(matches!(err, BackoffError::Exhausted { attempts: 4, .. }));
    assert_waited(
        &script.gaps(),
        &[
            Duration::from_millis(100),
            Duration::from_millis(1_000),
            Duration::from_millis(1_000),
        ],
    );
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_wait() {
    let script = Script::new(vec![Err(Upstream::RateLimited(Duration::from_secs(60)))]);
    let token = CancellationToken::new();
    let controller = BackoffController::new(config()).with_cancellation(token.clone());

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        token.cancel();
    });

    let start = Instant::now();
    let err = controller.run(|| script.call()).await.unwrap_err();
    canceller.await.unwrap();

    assert!(err.is_cancelled());
    assert_eq!(
        err.last_error(),
        Some(&Upstream::RateLimited(Duration::from_secs(60)))
    );
    assert!(start.elapsed() < Duration::from_secs(60));
    assert_eq!(script.attempts(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_before_first_attempt() {
    let script = Script::new(vec![Ok("never")]);
    let token = CancellationToken::new();
    token.cancel();

    let err = BackoffController::new(config())
        .with_cancellation(token)
        .run(|| script.call())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        BackoffError::Cancelled {
            attempts: 0,
            last: None
        }
    );
    assert_eq!(script.attempts(), 0);
}

fn http_error(status: u16, headers: &[(&str, &str)]) -> HttpError {
    let headers: BTreeMap<String, String> = headers
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let payload = ErrorPayload::new("https://api.test/channels/1/messages", headers, None);
    let kind = match status {
        403 => HttpErrorKind::Forbidden(payload),
        500..=599 => HttpErrorKind::InternalError { status, payload },
        _ => HttpErrorKind::Status { status, payload },
    };
    HttpError::new(kind)
}

#[tokio::test(start_paused = true)]
async fn test_http_errors_drive_the_schedule() {
    let responses = Arc::new(Mutex::new(VecDeque::from(vec![
        Err(http_error(429, &[("Retry-After", "1.5")])),
        Err(http_error(502, &[])),
        Ok(serde_json::json!({"id": "1"})),
    ])));
    let start = Instant::now();

    let value = BackoffController::new(config())
        .run(|| {
            let responses = Arc::clone(&responses);
            async move { responses.lock().unwrap().pop_front().unwrap() }
        })
        .await
        .unwrap();

    assert_eq!(value, serde_json::json!({"id": "1"}));
    assert_waited(&[start.elapsed()], &[Duration::from_millis(1_600)]);
}

#[tokio::test(start_paused = true)]
async fn test_http_forbidden_fails_fast() {
    let attempts = Arc::new(Mutex::new(0));

    let err = BackoffController::new(config())
        .run(|| {
            let attempts = Arc::clone(&attempts);
            async move {
                *attempts.lock().unwrap() += 1;
                Err::<(), _>(http_error(403, &[]))
            }
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err.last_error().map(HttpError::kind),
        Some(HttpErrorKind::Forbidden(_))
    ));
    assert_eq!(*attempts.lock().unwrap(), 1);
}
