//! Prometheus metrics

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Completed poll cycles
    Cycles,
    /// Cycles skipped because snapshots could not be fetched
    FailedCycles,
    /// Pair snapshots evaluated
    PairsAnalyzed,
    /// Pairs flagged as surging
    FlaggedPairs,
    /// Reports a sink could not deliver
    SinkFailures,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Pairs with volume history
    TrackedPairs,
    /// Pairs returned by the last successful fetch
    UniverseSize,
}

/// Start the Prometheus exporter on `0.0.0.0:port`
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to start metrics exporter: {}", e))?;

    tracing::info!(%addr, "Prometheus metrics exporter listening");
    Ok(())
}

/// Increment a counter
pub fn increment(metric: CounterMetric, value: u64) {
    let name = match metric {
        CounterMetric::Cycles => "surgescout_cycles_total",
        CounterMetric::FailedCycles => "surgescout_failed_cycles_total",
        CounterMetric::PairsAnalyzed => "surgescout_pairs_analyzed_total",
        CounterMetric::FlaggedPairs => "surgescout_flagged_pairs_total",
        CounterMetric::SinkFailures => "surgescout_sink_failures_total",
    };
    ::metrics::counter!(name).increment(value);
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    let name = match metric {
        GaugeMetric::TrackedPairs => "surgescout_tracked_pairs",
        GaugeMetric::UniverseSize => "surgescout_universe_size",
    };
    ::metrics::gauge!(name).set(value);
}

/// Record how long a poll cycle took
pub fn record_cycle_duration(duration: Duration) {
    ::metrics::histogram!("surgescout_cycle_duration_seconds").record(duration.as_secs_f64());
}
