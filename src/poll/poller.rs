//! Poll loop
//!
//! Each cycle fetches the pair universe, records rolling volumes, evaluates
//! every pair and hands the flagged ones to the report sink. Cycles never
//! overlap; a failed fetch skips the cycle and the loop carries on.

use crate::config::Config;
use crate::market::{PairFilter, PairSnapshot, SnapshotSource};
use crate::report::{CycleReport, ReportSink};
use crate::surge::{HistoryStore, SurgeEvaluator, SurgeReport};
use crate::telemetry::{self, CounterMetric, GaugeMetric};
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Drives the fetch, evaluate, report cycle
pub struct PollLoop<S: SnapshotSource, R: ReportSink> {
    source: S,
    sink: R,
    filter: PairFilter,
    evaluator: SurgeEvaluator,
    history: HistoryStore,
    interval: Duration,
}

impl<S: SnapshotSource, R: ReportSink> PollLoop<S, R> {
    /// Create a poll loop with an empty history
    pub fn new(
        source: S,
        sink: R,
        filter: PairFilter,
        evaluator: SurgeEvaluator,
        history_capacity: usize,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            sink,
            filter,
            evaluator,
            history: HistoryStore::new(history_capacity),
            interval,
        }
    }

    /// Create a poll loop from application configuration
    pub fn from_config(source: S, sink: R, config: &Config) -> Self {
        Self::new(
            source,
            sink,
            config.source.filter(),
            SurgeEvaluator::new(config.surge.clone()),
            config.history.capacity,
            Duration::from_secs(config.poll.interval_secs),
        )
    }

    /// Replace the history, e.g. to resume from a known state
    pub fn with_history(mut self, history: HistoryStore) -> Self {
        self.history = history;
        self
    }

    /// Volume history accumulated so far
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Pause between cycles
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Record and evaluate a batch of snapshots taken at `now`
    ///
    /// Pairs without a rolling volume are not recorded and cannot be flagged.
    pub fn process(&mut self, snapshots: &[PairSnapshot], now: DateTime<Utc>) -> Vec<SurgeReport> {
        let mut surges = Vec::new();

        for snapshot in snapshots {
            if let Some(volume) = snapshot.volume_h1 {
                self.history.record(&snapshot.pair_address, now, volume);
            }

            let verdict = self.evaluator.evaluate(snapshot, &self.history, now);
            if verdict.flagged() {
                tracing::debug!(
                    pair = %snapshot.pair_address,
                    name = %snapshot.name,
                    delta_5m = %verdict.delta_5m,
                    severity = %verdict.severity(),
                    "Volume surge detected"
                );
                surges.push(SurgeReport::new(snapshot, &verdict, now));
            }
        }

        surges
    }

    /// Run one cycle as of `now`
    ///
    /// Fails only when snapshots could not be fetched. Sink failures are
    /// logged and do not fail the cycle.
    pub async fn run_cycle_at(&mut self, now: DateTime<Utc>) -> anyhow::Result<CycleReport> {
        let snapshots = match self.source.list_pairs(&self.filter).await {
            Ok(snapshots) => snapshots,
            Err(e) => {
                telemetry::increment(CounterMetric::FailedCycles, 1);
                return Err(e.context("failed to fetch pair snapshots"));
            }
        };

        tracing::debug!(pairs = snapshots.len(), "Fetched pair snapshots");

        let surges = self.process(&snapshots, now);
        let report = CycleReport::new(now, snapshots.len(), surges);

        telemetry::increment(CounterMetric::Cycles, 1);
        telemetry::increment(CounterMetric::PairsAnalyzed, snapshots.len() as u64);
        telemetry::increment(CounterMetric::FlaggedPairs, report.surges.len() as u64);
        telemetry::set_gauge(GaugeMetric::UniverseSize, snapshots.len() as f64);
        telemetry::set_gauge(GaugeMetric::TrackedPairs, self.history.pair_count() as f64);

        if let Err(e) = self.sink.report(&report).await {
            telemetry::increment(CounterMetric::SinkFailures, 1);
            tracing::warn!(cycle_id = %report.cycle_id, error = %format!("{:#}", e), "Failed to report cycle");
        }

        Ok(report)
    }

    /// Run one cycle now
    pub async fn run_cycle(&mut self) -> anyhow::Result<CycleReport> {
        self.run_cycle_at(Utc::now()).await
    }

    /// Poll until the shutdown signal turns true or its sender is dropped
    ///
    /// Returns the number of cycles attempted.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> u64 {
        let mut cycles = 0u64;

        tracing::info!(
            interval_secs = self.interval.as_secs(),
            chain = %self.filter.chain_id,
            queries = self.filter.queries.len(),
            watched = self.filter.watch.len(),
            "Starting poll loop"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            cycles += 1;
            let started = Instant::now();
            match self.run_cycle().await {
                Ok(report) => tracing::info!(
                    cycle = cycles,
                    cycle_id = %report.cycle_id,
                    pairs = report.pairs_analyzed,
                    flagged = report.surges.len(),
                    tracked = self.history.pair_count(),
                    "Poll cycle complete"
                ),
                Err(e) => tracing::warn!(
                    cycle = cycles,
                    error = %format!("{:#}", e),
                    "Poll cycle skipped"
                ),
            }
            telemetry::record_cycle_duration(started.elapsed());

            tracing::debug!(secs = self.interval.as_secs(), "Waiting for next cycle");
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        tracing::info!(cycles, "Poll loop stopped");
        cycles
    }
}
