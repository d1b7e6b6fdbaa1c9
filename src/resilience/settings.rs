//! Breaker tuning: global defaults and per-target overrides.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::CircuitBreakerConfig;

/// Resolved settings for one circuit breaker. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakerSettings {
    /// Consecutive failures that trip the circuit. Also bounds the attempts made by one call.
    pub failure_threshold: u32,
    /// Successful probes required in half-open before the circuit closes.
    pub success_threshold: u32,
    /// How long the circuit stays open before a probe is allowed.
    pub open_duration: Duration,
    /// Pause between a failed attempt and the next one.
    pub retry_delay: Duration,
}

impl BreakerSettings {
    /// Merge a partial override record over these settings.
    ///
    /// Thresholds are clamped to at least 1.
    pub fn merged(&self, overrides: &BreakerOverrides) -> Self {
        Self {
            failure_threshold: overrides
                .failure_threshold
                .unwrap_or(self.failure_threshold)
                .max(1),
            success_threshold: overrides
                .success_threshold
                .unwrap_or(self.success_threshold)
                .max(1),
            open_duration: overrides
                .open_duration_ms
                .map(Duration::from_millis)
                .unwrap_or(self.open_duration),
            retry_delay: overrides
                .retry_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(self.retry_delay),
        }
    }
}

impl Default for BreakerSettings {
    fn default() -> Self {
        Self::from(&CircuitBreakerConfig::default())
    }
}

impl From<&CircuitBreakerConfig> for BreakerSettings {
    fn from(config: &CircuitBreakerConfig) -> Self {
        Self {
            failure_threshold: config.failure_threshold.max(1),
            success_threshold: config.success_threshold.max(1),
            open_duration: Duration::from_millis(config.open_duration_ms),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }
}

/// Partial settings for a single target. Unset fields inherit the global defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BreakerOverrides {
    pub failure_threshold: Option<u32>,
    pub success_threshold: Option<u32>,
    pub open_duration_ms: Option<u64>,
    pub retry_delay_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_merge_over_defaults() {
        let defaults = BreakerSettings {
            failure_threshold: 3,
            success_threshold: 2,
            open_duration: Duration::from_secs(10),
            retry_delay: Duration::from_secs(1),
        };
        let overrides = BreakerOverrides {
            failure_threshold: Some(7),
            retry_delay_ms: Some(250),
            ..Default::default()
        };

        let merged = defaults.merged(&overrides);
        assert_eq!(merged.failure_threshold, 7);
        assert_eq!(merged.success_threshold, 2);
        assert_eq!(merged.open_duration, Duration::from_secs(10));
        assert_eq!(merged.retry_delay, Duration::from_millis(250));
    }

    #[test]
    fn test_zero_thresholds_are_clamped() {
        let overrides = BreakerOverrides {
            failure_threshold: Some(0),
            success_threshold: Some(0),
            ..Default::default()
        };
        let merged = BreakerSettings::default().merged(&overrides);
        assert_eq!(merged.failure_threshold, 1);
        assert_eq!(merged.success_threshold, 1);
    }
}
