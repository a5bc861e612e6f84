//! Reporting module
//!
//! Sinks that receive the flagged pairs of every poll cycle

mod console;
mod jsonl;

pub use console::{format_cycle, format_usd, ConsoleSink};
pub use jsonl::JsonlSink;

use crate::surge::SurgeReport;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Everything a sink learns about one poll cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    /// Unique cycle identifier
    pub cycle_id: Uuid,
    /// When the cycle ran
    pub timestamp: DateTime<Utc>,
    /// Number of distinct pairs evaluated
    pub pairs_analyzed: usize,
    /// Flagged pairs, in source order
    pub surges: Vec<SurgeReport>,
}

impl CycleReport {
    /// Create a report for a cycle
    pub fn new(timestamp: DateTime<Utc>, pairs_analyzed: usize, surges: Vec<SurgeReport>) -> Self {
        Self {
            cycle_id: Uuid::new_v4(),
            timestamp,
            pairs_analyzed,
            surges,
        }
    }

    /// True when at least one pair was flagged
    pub fn has_surges(&self) -> bool {
        !self.surges.is_empty()
    }
}

/// Trait for report sink implementations
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Deliver one cycle's results
    async fn report(&self, cycle: &CycleReport) -> anyhow::Result<()>;
}

/// Fans a report out to several sinks
///
/// Every sink is tried even when an earlier one fails.
#[derive(Default)]
pub struct MultiSink {
    sinks: Vec<Box<dyn ReportSink>>,
}

impl MultiSink {
    /// Create an empty fan-out
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sink
    pub fn with(mut self, sink: impl ReportSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Number of attached sinks
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// True when no sinks are attached
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

#[async_trait]
impl ReportSink for MultiSink {
    async fn report(&self, cycle: &CycleReport) -> anyhow::Result<()> {
        let mut failed = 0usize;

        for sink in &self.sinks {
            if let Err(e) = sink.report(cycle).await {
                failed += 1;
                tracing::warn!(cycle_id = %cycle.cycle_id, error = %e, "Report sink failed");
            }
        }

        if failed > 0 {
            anyhow::bail!("{} of {} report sinks failed", failed, self.sinks.len());
        }
        Ok(())
    }
}
