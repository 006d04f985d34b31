//! Prometheus metrics for token property resolution
//!
//! Counts:
//! - Cache hits and misses on `batch_get`
//! - On-chain fee simulations and their failures
//! - Cache write-backs and their failures

use prometheus::{Encoder, IntCounter, Opts, Registry, TextEncoder};

/// Metrics state
pub struct ResolverMetrics {
    /// Prometheus registry
    registry: Registry,
    /// Addresses answered from the properties cache
    pub cache_hits: IntCounter,
    /// Addresses missing from the properties cache
    pub cache_misses: IntCounter,
    /// Single-token fee simulations issued
    pub fee_simulations: IntCounter,
    /// Fee simulations that reverted or failed in transport
    pub fee_simulation_failures: IntCounter,
    /// FOT entries written back to the cache
    pub cache_writes: IntCounter,
    /// Cache writes rejected by the backend
    pub cache_write_failures: IntCounter,
}

impl ResolverMetrics {
    /// Create a new metrics state with all counters registered
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let cache_hits = register_counter(
            &registry,
            "fot_resolver_cache_hits_total",
            "Token addresses served from the properties cache",
        )?;
        let cache_misses = register_counter(
            &registry,
            "fot_resolver_cache_misses_total",
            "Token addresses not found in the properties cache",
        )?;
        let fee_simulations = register_counter(
            &registry,
            "fot_resolver_fee_simulations_total",
            "Single-token fee detector calls issued",
        )?;
        let fee_simulation_failures = register_counter(
            &registry,
            "fot_resolver_fee_simulation_failures_total",
            "Fee detector calls that failed",
        )?;
        let cache_writes = register_counter(
            &registry,
            "fot_resolver_cache_writes_total",
            "FOT properties written back to the cache",
        )?;
        let cache_write_failures = register_counter(
            &registry,
            "fot_resolver_cache_write_failures_total",
            "Cache writes rejected by the backend",
        )?;

        Ok(Self {
            registry,
            cache_hits,
            cache_misses,
            fee_simulations,
            fee_simulation_failures,
            cache_writes,
            cache_write_failures,
        })
    }

    /// Render all metrics in the Prometheus text exposition format
    pub fn render(&self) -> prometheus::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;

        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

fn register_counter(registry: &Registry, name: &str, help: &str) -> prometheus::Result<IntCounter> {
    let counter = IntCounter::with_opts(Opts::new(name, help))?;
    registry.register(Box::new(counter.clone()))?;
    Ok(counter)
}
