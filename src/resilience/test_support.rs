//! Scripted executor for breaker unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde_json::Value;

use crate::resilience::error::TransportError;
use crate::resilience::request::{RequestDescriptor, RequestExecutor, UpstreamResponse};

#[derive(Debug, Clone)]
pub(crate) enum Outcome {
    Data(Value),
    Empty,
    Status(u16),
    Refused,
}

impl Outcome {
    fn into_result(self) -> Result<UpstreamResponse, TransportError> {
        match self {
            Outcome::Data(value) => Ok(UpstreamResponse::new(200, Some(value))),
            Outcome::Empty => Ok(UpstreamResponse::new(200, None)),
            Outcome::Status(status) => Ok(UpstreamResponse::new(status, None)),
            Outcome::Refused => Err(TransportError::Connect("connection refused".into())),
        }
    }
}

/// Replays queued outcomes, then repeats the fallback forever.
pub(crate) struct ScriptedExecutor {
    queue: Mutex<VecDeque<Outcome>>,
    fallback: Mutex<Outcome>,
    calls: AtomicUsize,
}

impl ScriptedExecutor {
    pub(crate) fn new(fallback: Outcome) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(fallback),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn push(&self, outcome: Outcome) {
        self.queue.lock().unwrap().push_back(outcome);
    }

    pub(crate) fn set_fallback(&self, outcome: Outcome) {
        *self.fallback.lock().unwrap() = outcome;
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RequestExecutor for ScriptedExecutor {
    async fn send(
        &self,
        _target: &str,
        _request: &RequestDescriptor,
    ) -> Result<UpstreamResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self
            .queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.lock().unwrap().clone());
        tokio::task::yield_now().await;
        outcome.into_result()
    }
}
