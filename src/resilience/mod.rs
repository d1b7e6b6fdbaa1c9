//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Caller (todo service, CLI, ...)
//!     → registry.rs (one breaker per normalized target)
//!     → circuit_breaker.rs (entry gate, attempt loop, state machine)
//!     → request.rs RequestExecutor (actual network call, see upstream/)
//!     ← payload, or error.rs BreakerError
//! ```
//!
//! # Design Decisions
//! - Breaker state is local to the process; nothing is shared across instances
//! - Open → HalfOpen is evaluated lazily on the next call, no timers
//! - Transport errors never escape raw; they are folded into `BreakerError`

pub mod circuit_breaker;
pub mod error;
pub mod registry;
pub mod request;
pub mod settings;

#[cfg(test)]
pub(crate) mod test_support;

pub use circuit_breaker::{BreakerSnapshot, CircuitBreaker, CircuitState};
pub use error::{BreakerError, TransportError, UpstreamFailure};
pub use registry::{normalize_target, BreakerRegistry};
pub use request::{RequestDescriptor, RequestExecutor, UpstreamResponse};
pub use settings::{BreakerOverrides, BreakerSettings};
