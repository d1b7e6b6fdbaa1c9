//! Outbound request descriptors and the executor seam.

use std::future::Future;

use axum::http::Method;
use serde_json::Value;

use crate::resilience::error::TransportError;

/// One outbound call, relative to a breaker's target.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Path relative to the target's base address, e.g. `/todos/1`.
    pub path: String,
    pub payload: Option<Value>,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            payload: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn post(path: impl Into<String>, payload: Value) -> Self {
        Self::new(Method::POST, path).with_payload(payload)
    }

    pub fn put(path: impl Into<String>, payload: Value) -> Self {
        Self::new(Method::PUT, path).with_payload(payload)
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// What the upstream answered, before the breaker classifies it.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub payload: Option<Value>,
}

impl UpstreamResponse {
    pub fn new(status: u16, payload: Option<Value>) -> Self {
        Self { status, payload }
    }

    /// 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Consume the response, keeping the payload only if it carries data.
    ///
    /// Absent payloads, JSON `null` and empty strings count as empty.
    pub fn into_usable_payload(self) -> Option<Value> {
        self.payload.filter(|payload| match payload {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            _ => true,
        })
    }
}

/// Performs the actual network call for a breaker.
///
/// Implementations report any HTTP status as `Ok`; only failures to obtain a
/// response at all (connect errors, timeouts) are `Err`.
pub trait RequestExecutor: Send + Sync + 'static {
    fn send(
        &self,
        target: &str,
        request: &RequestDescriptor,
    ) -> impl Future<Output = Result<UpstreamResponse, TransportError>> + Send;
}
