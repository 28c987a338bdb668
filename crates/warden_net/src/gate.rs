//! The serialized HTTP gate.

use crate::client::{Connect, HttpClient, ReqwestConnector};
use crate::{HttpGateConfig, PendingRequest, classify};
use serde_json::Value as JsonValue;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};
use warden_error::{HttpError, HttpErrorKind, HttpResult};

/// One shared network client, used by one request at a time.
///
/// Every request takes the gate's lock before it is sent and releases it only
/// after the whole body has been read, so two requests through the same gate
/// are never in flight together, whatever their targets. Separate gates are
/// independent.
///
/// The client is created on first use. [`close`](Self::close) tears it down and
/// the next request creates a new one.
///
/// Failures are classified (see [`classify`](crate::classify)) and returned
/// unchanged; the gate never retries.
///
/// # Example
///
/// ```no_run
/// use warden_net::{HttpGate, HttpGateConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let gate = HttpGate::new(HttpGateConfig::default());
/// let users = gate.get_key("https://api.example.com/users", "data").await?;
/// gate.close().await?;
/// # Ok(())
/// # }
/// ```
pub struct HttpGate<C: Connect = ReqwestConnector> {
    connector: C,
    client: Mutex<Option<C::Client>>,
}

impl HttpGate<ReqwestConnector> {
    /// Create a gate over a reqwest client.
    pub fn new(config: HttpGateConfig) -> Self {
        Self::with_connector(ReqwestConnector::new(config))
    }
}

impl<C: Connect> HttpGate<C> {
    /// Create a gate over any client type.
    pub fn with_connector(connector: C) -> Self {
        Self {
            connector,
            client: Mutex::new(None),
        }
    }

    /// Send a request and classify its response.
    ///
    /// # Errors
    ///
    /// - `BadRequest`, `Forbidden`, `NotFound`, `InternalError`, `Status` for
    ///   non-2xx responses
    /// - `TypeMismatch` if `extract` is set and the body is not a JSON object
    /// - `Decode` if a 2xx body is not JSON
    /// - `Transport` if no response was received
    #[instrument(skip_all, fields(method = %request.method(), url = %request.url()))]
    pub async fn request(&self, request: PendingRequest) -> HttpResult<JsonValue> {
        let response = {
            let mut slot = self.client.lock().await;
            if slot.is_none() {
                *slot = Some(self.connector.connect()?);
                debug!("Opened shared HTTP client");
            }
            let client = slot.as_mut().ok_or_else(|| {
                HttpError::new(HttpErrorKind::Transport("HTTP client unavailable".to_string()))
            })?;
            client.execute(&request).await?
        };

        debug!(status = response.status, bytes = response.body.len(), "Response read");
        classify(response, request.extract().as_deref())
    }

    /// `GET` a URL.
    pub async fn get(&self, url: impl Into<String>) -> HttpResult<JsonValue> {
        self.request(PendingRequest::get(url)).await
    }

    /// `GET` a URL and return one key of the JSON object it answers with.
    pub async fn get_key(
        &self,
        url: impl Into<String>,
        key: impl Into<String>,
    ) -> HttpResult<JsonValue> {
        self.request(PendingRequest::get(url).with_extract(key)).await
    }

    /// `POST` a JSON body.
    pub async fn post(&self, url: impl Into<String>, body: JsonValue) -> HttpResult<JsonValue> {
        self.request(PendingRequest::post(url).with_body(body)).await
    }

    /// `PUT` a JSON body.
    pub async fn put(&self, url: impl Into<String>, body: JsonValue) -> HttpResult<JsonValue> {
        self.request(PendingRequest::put(url).with_body(body)).await
    }

    /// `PATCH` a JSON body.
    pub async fn patch(&self, url: impl Into<String>, body: JsonValue) -> HttpResult<JsonValue> {
        self.request(PendingRequest::patch(url).with_body(body)).await
    }

    /// `DELETE` a URL.
    pub async fn delete(&self, url: impl Into<String>) -> HttpResult<JsonValue> {
        self.request(PendingRequest::delete(url)).await
    }

    /// Whether a client is currently open.
    ///
    /// Returns `true` while a request is in flight.
    pub fn is_open(&self) -> bool {
        match self.client.try_lock() {
            Ok(slot) => slot.is_some(),
            Err(_) => true,
        }
    }

    /// Tear down the shared client.
    ///
    /// Idempotent and safe on a gate that never sent a request. Must only be
    /// called between requests: if a request holds the gate this fails fast
    /// with `Shutdown` instead of waiting for it.
    ///
    /// # Errors
    ///
    /// Returns `Shutdown` if a request is in flight or the client failed to
    /// shut down.
    #[instrument(skip(self))]
    pub async fn close(&self) -> HttpResult<()> {
        let mut slot = self.client.try_lock().map_err(|_| {
            HttpError::new(HttpErrorKind::Shutdown(
                "cannot close while a request is in flight".to_string(),
            ))
        })?;

        let Some(mut client) = slot.take() else {
            debug!("HTTP client not open, nothing to close");
            return Ok(());
        };

        client.shutdown().await.map_err(|e| {
            if matches!(e.kind, HttpErrorKind::Shutdown(_)) {
                e
            } else {
                HttpError::new(HttpErrorKind::Shutdown(e.kind.to_string()))
            }
        })?;
        info!("Closed shared HTTP client");
        Ok(())
    }
}

impl<C: Connect> std::fmt::Debug for HttpGate<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGate")
            .field("open", &self.is_open())
            .finish()
    }
}
