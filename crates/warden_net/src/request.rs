//! Request and raw response types.

use derive_getters::Getters;
use reqwest::Method;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// One outbound call waiting for, or holding, the gate.
///
/// # Example
///
/// ```
/// use warden_net::PendingRequest;
/// use serde_json::json;
///
/// let request = PendingRequest::post("https://discord.com/api/v10/channels/1/messages")
///     .with_body(json!({"content": "Member has been banned."}))
///     .with_header("authorization", "Bot token");
/// assert!(request.body().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Getters, derive_setters::Setters)]
#[setters(prefix = "with_", strip_option)]
pub struct PendingRequest {
    /// HTTP method
    #[setters(skip)]
    method: Method,
    /// Target URL
    #[setters(skip)]
    url: String,
    /// JSON body, if any
    body: Option<JsonValue>,
    /// Key to pull out of a JSON object response
    #[setters(into)]
    extract: Option<String>,
    /// Extra request headers
    #[setters(skip)]
    headers: BTreeMap<String, String>,
}

impl PendingRequest {
    /// Create a request with no body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            extract: None,
            headers: BTreeMap::new(),
        }
    }

    /// `GET` request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// `POST` request.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    /// `PUT` request.
    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    /// `PATCH` request.
    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(Method::PATCH, url)
    }

    /// `DELETE` request.
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Add a request header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// A fully read response, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// Final URL of the response
    pub url: String,
    /// Status code
    pub status: u16,
    /// Response headers, names lowercased
    pub headers: BTreeMap<String, String>,
    /// Complete response body
    pub body: Vec<u8>,
}
