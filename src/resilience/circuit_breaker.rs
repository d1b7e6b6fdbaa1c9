//! Circuit breaker guarding one upstream target.
//!
//! # States
//! - Closed: normal operation, requests pass through
//! - Open: upstream assumed down, requests fail fast
//! - Half-Open: probing whether the upstream recovered
//!
//! # State Transitions
//! ```text
//! Closed   → Open:     failure_count >= failure_threshold
//! Open     → HalfOpen: first call after open_duration elapsed (evaluated lazily)
//! HalfOpen → Closed:   success_count >= success_threshold
//! HalfOpen → Open:     failure_count >= failure_threshold
//! ```
//!
//! # Design Decisions
//! - One breaker per target, shared by every caller of that target
//! - A call makes up to `failure_threshold` attempts, so one call can trip the circuit
//! - Attempts do not re-check the state; a mid-call trip takes effect on the next call
//! - Half-open probing reuses the normal attempt loop
//! - All counters live behind one mutex that is never held across an await

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::time::Instant;

use crate::resilience::error::{BreakerError, UpstreamFailure};
use crate::resilience::request::{RequestDescriptor, RequestExecutor};
use crate::resilience::settings::BreakerSettings;

/// Circuit state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CircuitState {
    Closed,
    HalfOpen,
    Open,
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CircuitState::Closed => f.write_str("CLOSED"),
            CircuitState::HalfOpen => f.write_str("HALF_OPEN"),
            CircuitState::Open => f.write_str("OPEN"),
        }
    }
}

/// Mutable breaker fields, always read and written together.
#[derive(Debug)]
struct BreakerState {
    state: CircuitState,
    failure_count: u32,
    success_count: u32,
    /// Meaningful only while open.
    next_attempt_at: Instant,
    trips: u64,
}

/// Point-in-time view of a breaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakerSnapshot {
    pub target: String,
    pub state: CircuitState,
    pub failure_count: u32,
    pub success_count: u32,
    /// Milliseconds until a probe is allowed; only set while open.
    pub retry_in_ms: Option<u64>,
    /// Number of times the circuit has tripped open.
    pub trips: u64,
}

/// Circuit breaker for one upstream target.
pub struct CircuitBreaker<E> {
    target: String,
    settings: BreakerSettings,
    executor: Arc<E>,
    inner: Mutex<BreakerState>,
}

impl<E> fmt::Debug for CircuitBreaker<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("target", &self.target)
            .field("settings", &self.settings)
            .field("inner", &*self.lock())
            .finish()
    }
}

impl<E> CircuitBreaker<E> {
    /// Create a closed breaker for `target` (the base address requests are sent to).
    pub fn new(target: impl Into<String>, settings: BreakerSettings, executor: Arc<E>) -> Self {
        let settings = BreakerSettings {
            failure_threshold: settings.failure_threshold.max(1),
            success_threshold: settings.success_threshold.max(1),
            ..settings
        };
        Self {
            target: target.into(),
            settings,
            executor,
            inner: Mutex::new(BreakerState {
                state: CircuitState::Closed,
                failure_count: 0,
                success_count: 0,
                next_attempt_at: Instant::now(),
                trips: 0,
            }),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn settings(&self) -> &BreakerSettings {
        &self.settings
    }

    pub fn state(&self) -> CircuitState {
        self.lock().state
    }

    pub fn snapshot(&self) -> BreakerSnapshot {
        let inner = self.lock();
        let retry_in_ms = (inner.state == CircuitState::Open).then(|| {
            inner
                .next_attempt_at
                .saturating_duration_since(Instant::now())
                .as_millis() as u64
        });
        BreakerSnapshot {
            target: self.target.clone(),
            state: inner.state,
            failure_count: inner.failure_count,
            success_count: inner.success_count,
            retry_in_ms,
            trips: inner.trips,
        }
    }

    fn lock(&self) -> MutexGuard<'_, BreakerState> {
        // Every critical section leaves the fields consistent, so a poisoned lock is still usable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Entry gate. Fails fast while open, moves to half-open once the open window has passed.
    fn admit(&self) -> Result<(), BreakerError> {
        let mut inner = self.lock();
        if inner.state != CircuitState::Open {
            return Ok(());
        }

        let now = Instant::now();
        if now < inner.next_attempt_at {
            let retry_in = inner.next_attempt_at - now;
            tracing::warn!(
                target_url = %self.target,
                failures = inner.failure_count,
                successes = inner.success_count,
                state = %inner.state,
                retry_in_ms = retry_in.as_millis() as u64,
                "Circuit is open, rejecting request"
            );
            return Err(BreakerError::CircuitOpen {
                target: self.target.clone(),
                retry_in,
            });
        }

        inner.state = CircuitState::HalfOpen;
        tracing::info!(
            target_url = %self.target,
            failures = inner.failure_count,
            successes = inner.success_count,
            state = %inner.state,
            "State transitioned to HALF_OPEN"
        );
        Ok(())
    }

    fn record_success(&self) {
        let mut inner = self.lock();
        inner.failure_count = 0;

        if inner.state == CircuitState::HalfOpen {
            inner.success_count += 1;
            if inner.success_count >= self.settings.success_threshold {
                inner.state = CircuitState::Closed;
                inner.success_count = 0;
                tracing::info!(
                    target_url = %self.target,
                    failures = inner.failure_count,
                    successes = inner.success_count,
                    state = %inner.state,
                    "Circuit closed, upstream is healthy again"
                );
                return;
            }
        }

        tracing::debug!(
            target_url = %self.target,
            failures = inner.failure_count,
            successes = inner.success_count,
            state = %inner.state,
            "Request succeeded"
        );
    }

    fn record_failure(&self, failure: &UpstreamFailure) {
        let mut inner = self.lock();
        inner.failure_count = inner.failure_count.saturating_add(1);

        tracing::warn!(
            target_url = %self.target,
            failures = inner.failure_count,
            successes = inner.success_count,
            state = %inner.state,
            status = ?failure.status,
            error = %failure.message,
            "Request failed"
        );

        // Calls that were already in flight when the circuit opened do not re-trip it.
        if inner.failure_count >= self.settings.failure_threshold
            && inner.state != CircuitState::Open
        {
            inner.state = CircuitState::Open;
            inner.next_attempt_at = Instant::now() + self.settings.open_duration;
            inner.trips += 1;
            tracing::warn!(
                target_url = %self.target,
                failures = inner.failure_count,
                successes = inner.success_count,
                state = %inner.state,
                open_for_ms = self.settings.open_duration.as_millis() as u64,
                "State transitioned to OPEN"
            );
        }
    }
}

impl<E: RequestExecutor> CircuitBreaker<E> {
    /// Send `request` to the target through the breaker.
    ///
    /// Makes up to `failure_threshold` attempts, sleeping `retry_delay` after each
    /// failed one. Cancel-safe: dropping the future abandons the current attempt.
    pub async fn execute(&self, request: &RequestDescriptor) -> Result<Value, BreakerError> {
        self.admit()?;

        let attempts = self.settings.failure_threshold;
        let mut last_failure = None;

        for attempt in 1..=attempts {
            let failure = match self.executor.send(&self.target, request).await {
                Ok(response) if response.is_success() => {
                    self.record_success();
                    return match response.into_usable_payload() {
                        Some(payload) => Ok(payload),
                        None => {
                            tracing::warn!(
                                target_url = %self.target,
                                method = %request.method,
                                path = %request.path,
                                "Request succeeded, but no content returned"
                            );
                            Err(BreakerError::EmptyResult {
                                target: self.target.clone(),
                                path: request.path.clone(),
                            })
                        }
                    };
                }
                Ok(response) => UpstreamFailure::from_status(
                    response.status,
                    response.payload.as_ref(),
                    &request.path,
                ),
                Err(err) => UpstreamFailure::from(err),
            };

            self.record_failure(&failure);
            last_failure = Some(failure);

            if attempt < attempts {
                tokio::time::sleep(self.settings.retry_delay).await;
            }
        }

        Err(BreakerError::RequestFailed {
            target: self.target.clone(),
            attempts,
            source: last_failure
                .unwrap_or_else(|| UpstreamFailure::new("Failed to execute request", None)),
        })
    }
}
