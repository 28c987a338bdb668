//! Status code classification.

use crate::RawResponse;
use serde_json::Value as JsonValue;
use tracing::warn;
use warden_error::{ErrorPayload, HttpError, HttpErrorKind, HttpResult};

/// Turn a completed response into a JSON value or a typed error.
///
/// | Status | Result |
/// |---|---|
/// | 200-299 | body, narrowed to `extract` when the key is present |
/// | 400 | `BadRequest` |
/// | 403 | `Forbidden` |
/// | 404 | `NotFound` |
/// | 500-599 | `InternalError` |
/// | other | `Status` |
///
/// An empty 2xx body (e.g. 204) is `null`.
pub fn classify(response: RawResponse, extract: Option<&str>) -> HttpResult<JsonValue> {
    let RawResponse {
        url,
        status,
        headers,
        body,
    } = response;

    if (200..300).contains(&status) {
        let data = if body.is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_slice(&body).map_err(|e| {
                HttpError::new(HttpErrorKind::Decode(format!(
                    "{} returned {} with a non-JSON body: {}",
                    url, status, e
                )))
            })?
        };
        return match extract {
            Some(key) => narrow(data, key, &url),
            None => Ok(data),
        };
    }

    let body = if body.is_empty() {
        None
    } else {
        serde_json::from_slice(&body).ok()
    };
    let payload = ErrorPayload::new(url, headers, body);

    let kind = match status {
        400 => HttpErrorKind::BadRequest(payload),
        403 => HttpErrorKind::Forbidden(payload),
        404 => HttpErrorKind::NotFound(payload),
        500..=599 => HttpErrorKind::InternalError { status, payload },
        _ => HttpErrorKind::Status { status, payload },
    };
    Err(HttpError::new(kind))
}

fn narrow(data: JsonValue, key: &str, url: &str) -> HttpResult<JsonValue> {
    match data {
        JsonValue::Object(mut map) => match map.remove(key) {
            Some(value) => Ok(value),
            None => {
                warn!(key, url, "Key not found in response, returning the full body");
                Ok(JsonValue::Object(map))
            }
        },
        other => Err(HttpError::new(HttpErrorKind::TypeMismatch {
            key: key.to_string(),
            found: json_type(&other).to_string(),
        })),
    }
}

fn json_type(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
