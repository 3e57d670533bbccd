//! HTTP transport collaborator.
//!
//! Adapters talk to providers through the [`HttpTransport`] trait so tests
//! can substitute canned responses. The production implementation wraps a
//! shared `reqwest::Client`; TLS, pooling, and timeouts live there, not here.

use async_trait::async_trait;
use tracing::debug;

use crate::error::Error;

/// Status code plus raw body, before any classification.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Generic HTTP request executor.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue one HTTP request. `Err` means no response was obtained;
    /// any status code, including ≥ 400, is an `Ok`.
    async fn execute(
        &self,
        method: &str,
        url: &str,
        headers: &[(String, String)],
        body: Option<String>,
    ) -> Result<HttpResponse, Error>;
}

/// Production transport backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing client to share its connection pool.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(
        &self,
        method: &str,
        url: &str,
        headers: &[(String, String)],
        body: Option<String>,
    ) -> Result<HttpResponse, Error> {
        let method = reqwest::Method::from_bytes(method.as_bytes())
            .map_err(|e| Error::Transport(format!("invalid HTTP method {method:?}: {e}")))?;

        let mut request = self.client.request(method, url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("failed to read response body: {e}")))?;

        debug!(status, body_len = body.len(), "HTTP exchange complete");
        Ok(HttpResponse { status, body })
    }
}
