//! Network client seam and the reqwest implementation.

use crate::{HttpGateConfig, PendingRequest, RawResponse};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;
use warden_error::{HttpError, HttpErrorKind, HttpResult};

/// A network client owned by an [`HttpGate`](crate::HttpGate).
///
/// The gate only ever calls one method at a time, so implementations need no
/// internal locking.
#[async_trait::async_trait]
pub trait HttpClient: Send {
    /// Send a request and read the complete response body.
    ///
    /// Only transport failures are errors here; every status code is a
    /// successful [`RawResponse`].
    async fn execute(&mut self, request: &PendingRequest) -> HttpResult<RawResponse>;

    /// Release the client's connections.
    async fn shutdown(&mut self) -> HttpResult<()>;
}

/// Builds the client lazily, on the gate's first request.
pub trait Connect: Send + Sync {
    /// Client type produced.
    type Client: HttpClient;

    /// Create a new client.
    fn connect(&self) -> HttpResult<Self::Client>;
}

/// Creates [`ReqwestClient`]s from an [`HttpGateConfig`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestConnector {
    config: HttpGateConfig,
}

impl ReqwestConnector {
    /// Create a connector.
    pub fn new(config: HttpGateConfig) -> Self {
        Self { config }
    }
}

impl Connect for ReqwestConnector {
    type Client = ReqwestClient;

    fn connect(&self) -> HttpResult<ReqwestClient> {
        let mut builder = reqwest::Client::builder().user_agent(self.config.user_agent().as_str());
        if *self.config.timeout_ms() > 0 {
            builder = builder.timeout(Duration::from_millis(*self.config.timeout_ms()));
        }
        let inner = builder.build().map_err(|e| {
            HttpError::new(HttpErrorKind::Transport(format!(
                "Failed to build HTTP client: {}",
                e
            )))
        })?;
        debug!(timeout_ms = self.config.timeout_ms(), "Created HTTP client");
        Ok(ReqwestClient { inner: Some(inner) })
    }
}

/// [`HttpClient`] over a `reqwest::Client` connection pool.
#[derive(Debug)]
pub struct ReqwestClient {
    inner: Option<reqwest::Client>,
}

fn transport(err: reqwest::Error) -> HttpError {
    HttpError::new(HttpErrorKind::Transport(err.to_string()))
}

#[async_trait::async_trait]
impl HttpClient for ReqwestClient {
    async fn execute(&mut self, request: &PendingRequest) -> HttpResult<RawResponse> {
        let client = self.inner.as_ref().ok_or_else(|| {
            HttpError::new(HttpErrorKind::Shutdown("client already shut down".to_string()))
        })?;

        let mut builder = client.request(request.method().clone(), request.url().as_str());
        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(transport)?;
        let url = response.url().to_string();
        let status = response.status().as_u16();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.bytes().await.map_err(transport)?.to_vec();

        Ok(RawResponse {
            url,
            status,
            headers,
            body,
        })
    }

    async fn shutdown(&mut self) -> HttpResult<()> {
        // Dropping the last handle closes the pool's idle connections.
        self.inner.take();
        Ok(())
    }
}
