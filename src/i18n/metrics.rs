//! Resolution metrics.
//!
//! Each engine owns its own counters, so two engines in one process never
//! mix their numbers.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters updated by [`I18n::t`](crate::I18n::t).
#[derive(Debug, Default)]
pub struct ResolveMetrics {
    /// Lookups answered from the resolved-string cache
    cache_hits: AtomicUsize,

    /// Lookups that had to walk a catalog
    cache_misses: AtomicUsize,

    /// Keys unresolved in the active language (one per `missingKey` event)
    missing_keys: AtomicUsize,

    /// Keys answered by the default language's catalog
    fallbacks: AtomicUsize,

    /// Keys found in no catalog and echoed back verbatim
    echoed_keys: AtomicUsize,
}

impl ResolveMetrics {
    /// All counters start at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// A resolution served from the cache.
    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// A resolution that had to consult the catalogs.
    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// The active language had no value for the key.
    pub fn record_missing_key(&self) {
        self.missing_keys.fetch_add(1, Ordering::Relaxed);
    }

    /// The default language supplied the value.
    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    /// No catalog had the key; the key itself was returned.
    pub fn record_echoed_key(&self) {
        self.echoed_keys.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot the counters.
    pub fn report(&self) -> MetricsReport {
        let hits = self.cache_hits.load(Ordering::Relaxed);
        let misses = self.cache_misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let cache_hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            cache_hits: hits,
            cache_misses: misses,
            cache_hit_rate,
            missing_keys: self.missing_keys.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
            echoed_keys: self.echoed_keys.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.cache_hits.store(0, Ordering::Relaxed);
        self.cache_misses.store(0, Ordering::Relaxed);
        self.missing_keys.store(0, Ordering::Relaxed);
        self.fallbacks.store(0, Ordering::Relaxed);
        self.echoed_keys.store(0, Ordering::Relaxed);
    }
}

/// Metrics report containing current resolution statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub cache_hits: usize,
    pub cache_misses: usize,

    /// Cache hit rate as a percentage (0-100)
    pub cache_hit_rate: f64,

    pub missing_keys: usize,
    pub fallbacks: usize,
    pub echoed_keys: usize,
}
