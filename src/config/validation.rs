//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (thresholds >= 1, windows > 0)
//! - Check upstream base URLs and the bind address parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate a fully merged configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.api.route_base.trim_matches('/').is_empty() {
        errors.push(ValidationError::new("api.route_base", "must not be empty"));
    }
    if config.api.version == 0 {
        errors.push(ValidationError::new("api.version", "must be at least 1"));
    }

    let breaker = &config.circuit_breaker;
    if breaker.failure_threshold == 0 {
        errors.push(ValidationError::new(
            "circuit_breaker.failure_threshold",
            "must be at least 1",
        ));
    }
    if breaker.success_threshold == 0 {
        errors.push(ValidationError::new(
            "circuit_breaker.success_threshold",
            "must be at least 1",
        ));
    }
    for (target, overrides) in &breaker.targets {
        if let Err(message) = check_base_url(target) {
            errors.push(ValidationError::new(
                format!("circuit_breaker.targets.\"{target}\""),
                message,
            ));
        }
        if overrides.failure_threshold == Some(0) {
            errors.push(ValidationError::new(
                format!("circuit_breaker.targets.\"{target}\".failure_threshold"),
                "must be at least 1",
            ));
        }
        if overrides.success_threshold == Some(0) {
            errors.push(ValidationError::new(
                format!("circuit_breaker.targets.\"{target}\".success_threshold"),
                "must be at least 1",
            ));
        }
    }

    if let Err(message) = check_base_url(&config.todo_service.base_url) {
        errors.push(ValidationError::new("todo_service.base_url", message));
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::new("timeouts.connect_secs", "must be greater than 0"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }
    if config.timeouts.call_secs == 0 {
        errors.push(ValidationError::new("timeouts.call_secs", "must be greater than 0"));
    }

    if config.rate_limit.enabled {
        if config.rate_limit.window_secs == 0 {
            errors.push(ValidationError::new("rate_limit.window_secs", "must be greater than 0"));
        }
        if config.rate_limit.max_requests == 0 {
            errors.push(ValidationError::new("rate_limit.max_requests", "must be greater than 0"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_base_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| format!("'{raw}' is not a valid URL: {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("'{raw}' uses unsupported scheme '{other}'")),
    }
}
