//! reqwest-based backend transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::redirect::Policy;
use tracing::debug;

use bridge_core::{
    Backend, BackendConfig, BackendRequest, BackendResponse, BaseUrl, BridgeError, Method, Result,
};

/// HTTP transport to the vector-store backend.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: BaseUrl,
    read_timeout: Duration,
    write_timeout: Duration,
}

impl HttpBackend {
    /// Build a transport from configuration.
    ///
    /// The base URL is checked against the host allow-list here, before any
    /// request can be issued. Redirects are never followed, so the backend
    /// cannot bounce the bridge to a host outside the allow-list.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let base_url = config.base_url()?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("memory-bridge/", env!("CARGO_PKG_VERSION")))
            .redirect(Policy::none())
            .connect_timeout(config.read_timeout())
            .build()
            .map_err(|e| BridgeError::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            read_timeout: config.read_timeout(),
            write_timeout: config.write_timeout(),
        })
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn send(&self, request: BackendRequest) -> Result<BackendResponse> {
        let url = self.base_url.endpoint(request.path());
        let (builder, timeout) = match request.method() {
            Method::Get => (self.client.get(url), self.read_timeout),
            Method::Post => (self.client.post(url), self.write_timeout),
        };

        let mut builder = builder.timeout(timeout);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!(path = request.path(), ?timeout, "sending backend request");
        let response = builder
            .send()
            .await
            .map_err(|e| unavailable(e, timeout))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| unavailable(e, timeout))?;

        Ok(BackendResponse { status, body })
    }
}

fn unavailable(err: reqwest::Error, timeout: Duration) -> BridgeError {
    if err.is_timeout() {
        BridgeError::backend_unavailable(format!(
            "request timed out after {}ms",
            timeout.as_millis()
        ))
    } else if err.is_connect() {
        BridgeError::backend_unavailable(format!("connection failed: {}", err))
    } else {
        BridgeError::backend_unavailable(err.to_string())
    }
}
