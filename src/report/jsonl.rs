//! JSON-lines file sink

use super::{CycleReport, ReportSink};
use crate::surge::SurgeReport;
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Appends one JSON object per flagged pair to a file
#[derive(Debug, Clone)]
pub struct JsonlSink {
    path: PathBuf,
}

#[derive(Serialize)]
struct JsonlRecord<'a> {
    cycle_id: Uuid,
    #[serde(flatten)]
    surge: &'a SurgeReport,
}

impl JsonlSink {
    /// Create a sink writing to `path`; parent directories are created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Output file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn encode(cycle: &CycleReport) -> anyhow::Result<String> {
        let mut buf = String::new();
        for surge in &cycle.surges {
            let record = JsonlRecord {
                cycle_id: cycle.cycle_id,
                surge,
            };
            buf.push_str(&serde_json::to_string(&record)?);
            buf.push('\n');
        }
        Ok(buf)
    }
}

#[async_trait]
impl ReportSink for JsonlSink {
    async fn report(&self, cycle: &CycleReport) -> anyhow::Result<()> {
        if !cycle.has_surges() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let lines = Self::encode(cycle)?;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(lines.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!(
            path = %self.path.display(),
            records = cycle.surges.len(),
            "Wrote surge records"
        );
        Ok(())
    }
}
