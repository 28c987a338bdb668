//! Upstream HTTP error types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Context captured from a non-2xx response.
///
/// This is the payload handed to callers for logging or rendering a
/// user-facing message: the requested URL, the response headers and the
/// response body parsed as JSON (`None` when the body was empty or not JSON).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// The URL that produced the response
    pub url: String,
    /// Response headers, names lowercased
    pub headers: BTreeMap<String, String>,
    /// Response body, if it was valid JSON
    pub body: Option<serde_json::Value>,
}

impl ErrorPayload {
    /// Create a payload from its three parts.
    pub fn new(
        url: impl Into<String>,
        headers: BTreeMap<String, String>,
        body: Option<serde_json::Value>,
    ) -> Self {
        Self {
            url: url.into(),
            headers,
            body,
        }
    }

    /// Look up a header by name, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Server-suggested cooldown, if the response carried one.
    ///
    /// Checks `Retry-After` and `X-RateLimit-Reset-After` (seconds, fractional
    /// allowed), then a top-level `retry_after` number in the JSON body.
    pub fn retry_after(&self) -> Option<Duration> {
        ["retry-after", "x-ratelimit-reset-after"]
            .iter()
            .filter_map(|name| self.header(name))
            .filter_map(|raw| raw.trim().parse::<f64>().ok())
            .chain(
                self.body
                    .as_ref()
                    .and_then(|body| body.get("retry_after"))
                    .and_then(serde_json::Value::as_f64),
            )
            .find_map(|secs| Duration::try_from_secs_f64(secs).ok())
    }
}

impl std::fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.body {
            Some(body) => write!(f, "{} ({})", self.url, body),
            None => write!(f, "{}", self.url),
        }
    }
}

/// Kinds of upstream HTTP errors.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum HttpErrorKind {
    /// 400 response
    #[display("Bad request: {}", _0)]
    BadRequest(ErrorPayload),
    /// 403 response
    #[display("Forbidden: {}", _0)]
    Forbidden(ErrorPayload),
    /// 404 response
    #[display("Not found: {}", _0)]
    NotFound(ErrorPayload),
    /// 5xx response
    #[display("Internal server error ({}): {}", status, payload)]
    InternalError {
        /// Status code in the 500-599 range
        status: u16,
        /// Response context
        payload: ErrorPayload,
    },
    /// Any other non-2xx response
    #[display("Unexpected status {}: {}", status, payload)]
    Status {
        /// Status code
        status: u16,
        /// Response context
        payload: ErrorPayload,
    },
    /// The caller asked to extract a key from a body that is not a JSON object
    #[display("Cannot extract '{}' from a JSON {}", key, found)]
    TypeMismatch {
        /// Requested key
        key: String,
        /// JSON type of the body that was received
        found: String,
    },
    /// A success response body was not valid JSON
    #[display("Failed to decode response body: {}", _0)]
    Decode(String),
    /// Connection, TLS or timeout failure before a response was read
    #[display("Transport failure: {}", _0)]
    Transport(String),
    /// Tearing down the shared client failed, or was attempted mid-request
    #[display("Shutdown failed: {}", _0)]
    Shutdown(String),
}

impl HttpErrorKind {
    /// Response context, for the status-derived kinds.
    pub fn payload(&self) -> Option<&ErrorPayload> {
        match self {
            HttpErrorKind::BadRequest(payload)
            | HttpErrorKind::Forbidden(payload)
            | HttpErrorKind::NotFound(payload)
            | HttpErrorKind::InternalError { payload, .. }
            | HttpErrorKind::Status { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// HTTP status code, for the status-derived kinds.
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpErrorKind::BadRequest(_) => Some(400),
            HttpErrorKind::Forbidden(_) => Some(403),
            HttpErrorKind::NotFound(_) => Some(404),
            HttpErrorKind::InternalError { status, .. } | HttpErrorKind::Status { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Short message suitable for showing to a chat user.
    pub fn user_message(&self) -> String {
        match self {
            HttpErrorKind::BadRequest(_) => "The request was rejected as malformed.".to_string(),
            HttpErrorKind::Forbidden(_) => "Missing access to that resource.".to_string(),
            HttpErrorKind::NotFound(_) => "Nothing was found.".to_string(),
            HttpErrorKind::InternalError { .. } => {
                "The upstream service is having problems, try again later.".to_string()
            }
            HttpErrorKind::Status { status: 429, .. } => {
                "Being rate limited, try again later.".to_string()
            }
            HttpErrorKind::Status { status, .. } => {
                format!("The upstream service answered with status {}.", status)
            }
            HttpErrorKind::TypeMismatch { .. } | HttpErrorKind::Decode(_) => {
                "The upstream service returned something unexpected.".to_string()
            }
            HttpErrorKind::Transport(_) => "Could not reach the upstream service.".to_string(),
            HttpErrorKind::Shutdown(_) => "The HTTP client is shutting down.".to_string(),
        }
    }
}

/// HTTP error with location tracking.
///
/// # Examples
///
/// ```
/// use warden_error::{ErrorPayload, HttpError, HttpErrorKind};
///
/// let payload = ErrorPayload::new("https://example.com/x", Default::default(), None);
/// let err = HttpError::new(HttpErrorKind::NotFound(payload));
/// assert_eq!(err.kind().status(), Some(404));
/// assert!(format!("{}", err).contains("https://example.com/x"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("HTTP Error: {} at line {} in {}", kind, line, file)]
pub struct HttpError {
    /// The kind of error that occurred
    pub kind: HttpErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl HttpError {
    /// Create a new HttpError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: HttpErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &HttpErrorKind {
        &self.kind
    }
}

/// Result type for HTTP gate operations.
pub type HttpResult<T> = std::result::Result<T, HttpError>;
