// src/metrics/collector.rs
use anyhow::Result;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct MetricsRegistry {
    registry: Registry,
    collector: Arc<MetricsCollector>,
}

impl MetricsRegistry {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let collector = Arc::new(MetricsCollector::new(&registry)?);

        Ok(Self {
            registry,
            collector,
        })
    }

    pub fn collector(&self) -> Arc<MetricsCollector> {
        self.collector.clone()
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn gather(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

pub struct MetricsCollector {
    pub results_stored: IntGauge,
    pub results_added_total: IntCounter,
    pub results_expired_total: IntCounter,
    pub purge_duration_seconds: Histogram,
}

impl MetricsCollector {
    pub fn new(registry: &Registry) -> Result<Self> {
        let results_stored =
            IntGauge::new("store_results", "Number of healthcheck results currently stored")?;
        registry.register(Box::new(results_stored.clone()))?;

        let results_added_total = IntCounter::new(
            "store_results_added_total",
            "Total number of healthcheck results added to the store",
        )?;
        registry.register(Box::new(results_added_total.clone()))?;

        let results_expired_total = IntCounter::new(
            "store_results_expired_total",
            "Total number of healthcheck results removed after their TTL",
        )?;
        registry.register(Box::new(results_expired_total.clone()))?;

        let purge_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "store_purge_duration_seconds",
            "Duration of a purge pass in seconds",
        ))?;
        registry.register(Box::new(purge_duration_seconds.clone()))?;

        Ok(Self {
            results_stored,
            results_added_total,
            results_expired_total,
            purge_duration_seconds,
        })
    }

    pub fn record_add(&self, stored: usize) {
        self.results_added_total.inc();
        self.results_stored.set(stored as i64);
    }

    pub fn record_purge(&self, expired: usize, stored: usize, duration: Duration) {
        self.results_expired_total.inc_by(expired as u64);
        self.results_stored.set(stored as i64);
        self.purge_duration_seconds.observe(duration.as_secs_f64());
    }
}

// Helper for timing operations
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
