//! Error taxonomy for breaker-guarded calls.

use std::fmt;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

/// Failure to obtain any response from the upstream.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("invalid upstream url: {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Other(String),
}

/// The last failed attempt of a call: a message and, when the upstream answered, its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamFailure {
    pub message: String,
    pub status: Option<u16>,
}

impl UpstreamFailure {
    pub fn new(message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    /// Classify a non-2xx answer. A `message` field in a JSON error body wins.
    pub fn from_status(status: u16, payload: Option<&Value>, path: &str) -> Self {
        let message = payload
            .and_then(|p| p.get("message"))
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| format!("Failed Status: {status} from {path}"));
        Self::new(message, Some(status))
    }
}

impl From<TransportError> for UpstreamFailure {
    fn from(err: TransportError) -> Self {
        Self::new(err.to_string(), None)
    }
}

impl fmt::Display for UpstreamFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (status {})", self.message, status),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for UpstreamFailure {}

/// Everything `CircuitBreaker::execute` can fail with.
#[derive(Debug, Clone, Error)]
pub enum BreakerError {
    /// Rejected without contacting the upstream.
    #[error("Circuit is open for {target}. No requests allowed. Retry in {} seconds.", whole_seconds(.retry_in))]
    CircuitOpen { target: String, retry_in: Duration },

    /// The upstream answered 2xx with nothing in it.
    #[error("No data found at {target}{path}")]
    EmptyResult { target: String, path: String },

    /// Every attempt of the call failed.
    #[error("Request to {target} failed after {attempts} attempt(s): {source}")]
    RequestFailed {
        target: String,
        attempts: u32,
        #[source]
        source: UpstreamFailure,
    },
}

impl BreakerError {
    /// Time the caller should wait before trying again, if the circuit is open.
    pub fn retry_in(&self) -> Option<Duration> {
        match self {
            BreakerError::CircuitOpen { retry_in, .. } => Some(*retry_in),
            _ => None,
        }
    }
}

fn whole_seconds(duration: &Duration) -> u64 {
    duration.as_secs_f64().round() as u64
}
