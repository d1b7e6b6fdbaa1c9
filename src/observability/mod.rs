//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (target_url, state, failures, ...)
//!     → logging.rs subscriber (EnvFilter + fmt) writes them to stdout
//! HTTP layer:
//!     → tower-http TraceLayer spans, tagged with x-request-id
//! ```

pub mod logging;

pub use logging::init_logging;
