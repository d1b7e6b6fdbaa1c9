//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Env: {name} has an invalid value {value:?}")]
    Env { name: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration: optional TOML file, then environment overrides, then validation.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => GatewayConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply the environment variables understood by the gateway.
///
/// `lookup` resolves a variable name; empty values are treated as unset.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(port) = parsed::<u16>(&get, "PORT")? {
        let host = config
            .listener
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| "0.0.0.0".to_string());
        config.listener.bind_address = format!("{host}:{port}");
    }
    if let Some(route_base) = get("ROUTE_BASE") {
        config.api.route_base = route_base;
    }
    if let Some(version) = parsed(&get, "VERSION")? {
        config.api.version = version;
    }

    let breaker = &mut config.circuit_breaker;
    if let Some(v) = parsed(&get, "CIRCUIT_BREAKER_FAILURE_THRESHOLD")? {
        breaker.failure_threshold = v;
    }
    if let Some(v) = parsed(&get, "CIRCUIT_BREAKER_SUCCESS_THRESHOLD")? {
        breaker.success_threshold = v;
    }
    if let Some(v) = parsed(&get, "CIRCUIT_BREAKER_TIMEOUT")? {
        breaker.open_duration_ms = v;
    }
    if let Some(v) = parsed(&get, "CIRCUIT_BREAKER_RETRY_DELAY")? {
        breaker.retry_delay_ms = v;
    }

    if let Some(base_url) = get("TODO_SERVICE_BASE_URL") {
        config.todo_service.base_url = base_url;
    }
    if let Some(level) = get("LOG_LEVEL") {
        config.observability.log_level = level;
    }

    Ok(())
}

fn parsed<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    match get(name) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Env { name, value }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_env_overrides_apply() {
        let mut config = GatewayConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("PORT", "9000"),
                ("ROUTE_BASE", "todo-api"),
                ("VERSION", "2"),
                ("CIRCUIT_BREAKER_FAILURE_THRESHOLD", "5"),
                ("CIRCUIT_BREAKER_SUCCESS_THRESHOLD", "4"),
                ("CIRCUIT_BREAKER_TIMEOUT", "30000"),
                ("TODO_SERVICE_BASE_URL", "http://todos:3000"),
            ]),
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "0.0.0.0:9000");
        assert_eq!(config.api_base_path(), "/todo-api/v2");
        assert_eq!(config.circuit_breaker.failure_threshold, 5);
        assert_eq!(config.circuit_breaker.success_threshold, 4);
        assert_eq!(config.circuit_breaker.open_duration_ms, 30_000);
        assert_eq!(config.circuit_breaker.retry_delay_ms, 1_000);
        assert_eq!(config.todo_service.base_url, "http://todos:3000");
    }

    #[test]
    fn test_unparseable_env_is_an_error() {
        let mut config = GatewayConfig::default();
        let err = apply_env_overrides(&mut config, env(&[("CIRCUIT_BREAKER_FAILURE_THRESHOLD", "many")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Env { name: "CIRCUIT_BREAKER_FAILURE_THRESHOLD", .. }
        ));
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut config = GatewayConfig::default();
        apply_env_overrides(&mut config, env(&[("PORT", ""), ("ROUTE_BASE", "  ")])).unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.api.route_base, "api");
    }

    #[test]
    fn test_load_config_reports_missing_file() {
        let err = load_config(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
