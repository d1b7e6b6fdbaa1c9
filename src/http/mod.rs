//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request id, trace, timeout, limits)
//!     → security (rate limit, response headers)
//!     → handlers.rs (validation.rs, then the todo service)
//!     → error.rs (breaker/validation errors → JSON error responses)
//!     → Send to client
//! ```

pub mod error;
pub mod handlers;
pub mod server;
pub mod validation;

pub use error::{ApiError, FieldError};
pub use server::{build_router, AppState, HttpServer};
