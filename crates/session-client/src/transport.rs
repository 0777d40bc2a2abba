//! HTTP transport seam.

use crate::{ApiRequest, ApiResponse, SessionError, SessionResult};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Sends one request and returns the fully-read response.
///
/// Implementations must not interpret status codes; a 401 or 500 is a
/// successful `send`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> SessionResult<ApiResponse>;
}

/// Transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Create a transport for `base_url` with an optional per-request timeout.
    pub fn new(base_url: Url, timeout: Option<Duration>) -> SessionResult<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("medassist/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a request path against the base URL, keeping any base path prefix.
    pub fn resolve(&self, path: &str) -> SessionResult<Url> {
        if let Ok(absolute) = Url::parse(path) {
            return Ok(absolute);
        }

        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        Ok(base.join(path.trim_start_matches('/'))?)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> SessionResult<ApiResponse> {
        let url = self.resolve(&request.path)?;
        debug!(method = %request.method, url = %url, "Sending request");

        let mut builder = self
            .client
            .request(request.method, url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                SessionError::Timeout
            } else {
                SessionError::Http(e)
            }
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        debug!(status = %status, bytes = body.len(), "Received response");

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}
