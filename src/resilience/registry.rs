//! Per-target breaker registry.
//!
//! # Responsibilities
//! - Hand out exactly one breaker per normalized target
//! - Merge per-target overrides over the global defaults on first use
//! - Expose snapshots of every breaker for diagnostics
//!
//! # Design Decisions
//! - Owned value injected into callers, not a process-wide static
//! - Get-or-create goes through a `DashMap` entry, so racing first callers share one instance
//! - First writer wins: overrides passed after creation are ignored

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;

use crate::config::CircuitBreakerConfig;
use crate::resilience::circuit_breaker::{BreakerSnapshot, CircuitBreaker};
use crate::resilience::settings::{BreakerOverrides, BreakerSettings};

/// Normalize a target identity: trimmed, lower-cased, without trailing slashes.
pub fn normalize_target(target: &str) -> String {
    target.trim().trim_end_matches('/').to_lowercase()
}

/// Lazily creates and caches one circuit breaker per target.
pub struct BreakerRegistry<E> {
    defaults: BreakerSettings,
    configured: HashMap<String, BreakerOverrides>,
    executor: Arc<E>,
    breakers: DashMap<String, Arc<CircuitBreaker<E>>>,
}

impl<E> BreakerRegistry<E> {
    /// Registry whose breakers inherit `defaults` and send through `executor`.
    pub fn new(defaults: BreakerSettings, executor: Arc<E>) -> Self {
        Self {
            defaults,
            configured: HashMap::new(),
            executor,
            breakers: DashMap::new(),
        }
    }

    /// Registry built from the `[circuit_breaker]` config section, including its per-target overrides.
    pub fn from_config(config: &CircuitBreakerConfig, executor: Arc<E>) -> Self {
        let mut registry = Self::new(BreakerSettings::from(config), executor);
        registry.configured = config
            .targets
            .iter()
            .map(|(target, overrides)| (normalize_target(target), overrides.clone()))
            .collect();
        registry
    }

    pub fn defaults(&self) -> &BreakerSettings {
        &self.defaults
    }

    /// Get the breaker for `target`, creating it on first use.
    ///
    /// `overrides` only apply when this call creates the breaker. Without
    /// explicit overrides, those configured for the target are used.
    pub fn get(&self, target: &str, overrides: Option<&BreakerOverrides>) -> Arc<CircuitBreaker<E>> {
        let key = normalize_target(target);
        if let Some(existing) = self.breakers.get(&key) {
            return existing.clone();
        }

        self.breakers
            .entry(key.clone())
            .or_insert_with(|| {
                let settings = match overrides.or_else(|| self.configured.get(&key)) {
                    Some(overrides) => self.defaults.merged(overrides),
                    None => self.defaults,
                };
                tracing::debug!(
                    target_url = %key,
                    failure_threshold = settings.failure_threshold,
                    success_threshold = settings.success_threshold,
                    open_duration_ms = settings.open_duration.as_millis() as u64,
                    retry_delay_ms = settings.retry_delay.as_millis() as u64,
                    "Creating circuit breaker"
                );
                Arc::new(CircuitBreaker::new(
                    target.trim().trim_end_matches('/'),
                    settings,
                    self.executor.clone(),
                ))
            })
            .clone()
    }

    /// Shorthand for `get(target, None)`.
    pub fn breaker(&self, target: &str) -> Arc<CircuitBreaker<E>> {
        self.get(target, None)
    }

    /// Snapshots of every breaker, sorted by target.
    pub fn snapshots(&self) -> Vec<BreakerSnapshot> {
        let mut snapshots: Vec<_> = self
            .breakers
            .iter()
            .map(|entry| entry.value().snapshot())
            .collect();
        snapshots.sort_by(|a, b| a.target.cmp(&b.target));
        snapshots
    }

    pub fn len(&self) -> usize {
        self.breakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breakers.is_empty()
    }
}
