//! Todo gateway library: an HTTP front for a remote todo service, guarded
//! by per-target circuit breakers.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod security;
pub mod todo;
pub mod upstream;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use resilience::{BreakerRegistry, CircuitBreaker};
