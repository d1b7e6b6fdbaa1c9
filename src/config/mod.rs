//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overrides: PORT, CIRCUIT_BREAKER_*, ...)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → handed to the server, registry and rate limiter at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; breaker settings are fixed at construction
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ApiConfig, CircuitBreakerConfig, GatewayConfig, ListenerConfig, ObservabilityConfig,
    RateLimitConfig, SecurityConfig, TimeoutConfig, TodoServiceConfig,
};
pub use validation::ValidationError;
