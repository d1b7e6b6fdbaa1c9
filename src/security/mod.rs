//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (check per-IP limits)
//!     → body size limit (tower-http, see http/server.rs)
//!     → handlers
//! Outgoing response:
//!     → headers.rs (hardening headers, CORS)
//! ```
//!
//! # Design Decisions
//! - Fail closed: over-limit clients get 429 before any upstream call
//! - No trust in client input; handlers validate everything they read

pub mod headers;
pub mod rate_limit;

pub use rate_limit::{rate_limit_middleware, RateLimiter};
