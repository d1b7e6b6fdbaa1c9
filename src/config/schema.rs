//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::resilience::BreakerOverrides;

/// Root configuration for the todo gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Public API prefix.
    pub api: ApiConfig,

    /// Circuit breaker defaults and per-target overrides.
    pub circuit_breaker: CircuitBreakerConfig,

    /// The upstream todo service.
    pub todo_service: TodoServiceConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Rate limiting configuration.
    pub rate_limit: RateLimitConfig,

    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl GatewayConfig {
    /// Path prefix every API route is mounted under, e.g. `/api/v1`.
    pub fn api_base_path(&self) -> String {
        format!(
            "/{}/v{}",
            self.api.route_base.trim_matches('/'),
            self.api.version
        )
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// API mount point: routes live under `/{route_base}/v{version}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    pub route_base: String,
    pub version: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            route_base: "api".to_string(),
            version: 1,
        }
    }
}

/// Circuit breaker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures before the circuit opens (also the per-call attempt bound).
    pub failure_threshold: u32,

    /// Successful half-open probes before the circuit closes.
    pub success_threshold: u32,

    /// How long an open circuit rejects calls, in milliseconds.
    pub open_duration_ms: u64,

    /// Delay between failed attempts, in milliseconds.
    pub retry_delay_ms: u64,

    /// Per-target overrides keyed by base URL (case-insensitive).
    pub targets: HashMap<String, BreakerOverrides>,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            success_threshold: 2,
            open_duration_ms: 10_000,
            retry_delay_ms: 1_000,
            targets: HashMap::new(),
        }
    }
}

/// Upstream todo service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TodoServiceConfig {
    /// Base URL of the todo REST service.
    pub base_url: String,
}

impl Default for TodoServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Timeout for a single upstream attempt in seconds.
    pub request_secs: u64,

    /// Deadline for a whole inbound request, retries included, in seconds.
    pub call_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 10,
            call_secs: 60,
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Window length in seconds.
    pub window_secs: u64,

    /// Requests allowed per client IP within one window.
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window_secs: 5 * 60,
            max_requests: 10_000,
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security headers.
    pub enable_headers: bool,
    /// Maximum body size in bytes.
    pub max_body_size: usize,
    /// Allow cross-origin requests.
    pub cors: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 1024 * 1024, // 1MB
            cors: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
