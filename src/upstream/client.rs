//! `reqwest`-backed request executor.

use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::config::TimeoutConfig;
use crate::resilience::{RequestDescriptor, RequestExecutor, TransportError, UpstreamResponse};

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

/// Sends breaker requests over HTTP.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: reqwest::Client,
}

impl HttpExecutor {
    pub fn new(timeouts: &TimeoutConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.request_secs))
            // Upstreams are internal services; never route them through HTTP(S)_PROXY.
            .no_proxy()
            .build()?;
        Ok(Self { client })
    }
}

/// Join a base address and a target-relative path.
pub fn join_url(target: &str, path: &str) -> Result<Url, TransportError> {
    let raw = format!(
        "{}/{}",
        target.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&raw).map_err(|e| TransportError::InvalidUrl(format!("{raw}: {e}")))
}

fn decode_body(bytes: &[u8]) -> Option<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    Some(
        serde_json::from_slice(bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned())),
    )
}

impl RequestExecutor for HttpExecutor {
    async fn send(
        &self,
        target: &str,
        request: &RequestDescriptor,
    ) -> Result<UpstreamResponse, TransportError> {
        let url = join_url(target, &request.path)?;

        let mut builder = self.client.request(request.method.clone(), url);
        if let Some(payload) = &request.payload {
            builder = builder.json(payload);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;

        tracing::trace!(
            target_url = %target,
            method = %request.method,
            path = %request.path,
            status,
            body_len = bytes.len(),
            "Upstream responded"
        );

        Ok(UpstreamResponse::new(status, decode_body(&bytes)))
    }
}
