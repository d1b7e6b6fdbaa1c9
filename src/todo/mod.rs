//! Todo domain.
//!
//! # Data Flow
//! ```text
//! HTTP handler
//!     → service.rs (build RequestDescriptor for /todos...)
//!     → CircuitBreaker for todo_service.base_url
//!     ← JSON payload decoded into types.rs
//! ```

pub mod service;
pub mod types;

pub use service::{TodoError, TodoService};
pub use types::TodoData;
