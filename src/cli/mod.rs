//! CLI interface for surge-scout
//!
//! Provides subcommands for:
//! - `run`: Poll continuously and report volume surges
//! - `scan`: Run a single poll cycle
//! - `pair`: Look up one pair
//! - `config`: Show the effective configuration

mod pair;
mod run;
mod scan;

pub use pair::PairArgs;
pub use run::RunArgs;
pub use scan::ScanArgs;

use crate::config::Config;
use crate::market::{DexScreenerClient, DexScreenerConfig};
use crate::report::{ConsoleSink, JsonlSink, MultiSink};
use clap::{Parser, Subcommand};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "surge-scout")]
#[command(about = "Volume surge detector for DEX trading pairs")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll continuously and report volume surges
    Run(RunArgs),
    /// Run a single poll cycle
    Scan(ScanArgs),
    /// Look up one pair
    Pair(PairArgs),
    /// Show the effective configuration
    Config,
}

/// DexScreener client configured from the `[source]` section
pub(crate) fn build_client(config: &Config) -> anyhow::Result<DexScreenerClient> {
    DexScreenerClient::with_config(DexScreenerConfig {
        base_url: config.source.base_url.clone(),
        timeout: Duration::from_secs(config.source.timeout_secs),
        query_delay: Duration::from_millis(config.source.query_delay_ms),
    })
}

/// Report sinks configured from the `[report]` section
pub(crate) fn build_sink(config: &Config) -> MultiSink {
    let mut sink = MultiSink::new();
    if config.report.console {
        sink = sink.with(ConsoleSink::new(config.source.chain_id.clone()));
    }
    if let Some(path) = &config.report.jsonl_path {
        sink = sink.with(JsonlSink::new(path.clone()));
    }
    sink
}
