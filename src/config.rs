//! Configuration types for surge-scout

use crate::market::{PairFilter, DEXSCREENER_API_URL};
use crate::surge::DEFAULT_HISTORY_CAPACITY;
use chrono::Duration;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Rejected configuration values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("history capacity must be at least 1")]
    ZeroCapacity,

    #[error("poll interval must be at least 1 second")]
    ZeroInterval,

    #[error("volume increase factor must be positive, got {0}")]
    NonPositiveFactor(Decimal),

    #[error("chain id must not be empty")]
    EmptyChain,

    #[error("lookback of {0} seconds is out of range")]
    LookbackOutOfRange(u64),
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub surge: SurgeConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Market data source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// DexScreener API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Chain to scan
    #[serde(default = "default_chain_id")]
    pub chain_id: String,

    /// Broad search terms, queried once per cycle each
    #[serde(default = "default_queries")]
    pub queries: Vec<String>,

    /// Pair addresses always included in the scan
    #[serde(default = "default_watch")]
    pub watch: Vec<String>,

    /// HTTP request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Pause between upstream requests (milliseconds)
    #[serde(default = "default_query_delay_ms")]
    pub query_delay_ms: u64,
}

fn default_base_url() -> String {
    DEXSCREENER_API_URL.to_string()
}
fn default_chain_id() -> String {
    "bsc".to_string()
}
fn default_queries() -> Vec<String> {
    [
        "bnb",
        "wbnb",
        "busd",
        "usdt",
        "cake",
        "pancakeswap",
        "ape",
        "doge",
        "shib",
        "floki",
    ]
    .iter()
    .map(|q| q.to_string())
    .collect()
}
fn default_watch() -> Vec<String> {
    vec!["0xee2f63a49cb190962619183103d25af14ce5f538".to_string()]
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_query_delay_ms() -> u64 {
    500
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chain_id: default_chain_id(),
            queries: default_queries(),
            watch: default_watch(),
            timeout_secs: default_timeout_secs(),
            query_delay_ms: default_query_delay_ms(),
        }
    }
}

impl SourceConfig {
    /// Filter passed to the snapshot source each cycle
    pub fn filter(&self) -> PairFilter {
        PairFilter {
            chain_id: self.chain_id.clone(),
            queries: self.queries.clone(),
            watch: self.watch.clone(),
        }
    }
}

/// Surge detection thresholds
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SurgeConfig {
    /// Current volume must exceed the baseline by this factor
    #[serde(default = "default_volume_increase_factor")]
    pub volume_increase_factor: Decimal,

    /// Minimum volume added over the lookback window
    #[serde(default = "default_min_5min_volume")]
    pub min_5min_volume: Decimal,

    /// Pairs younger than this are never flagged
    #[serde(default = "default_token_age_threshold_hours")]
    pub token_age_threshold_hours: Decimal,

    /// How far back the baseline sample must lie (seconds)
    #[serde(default = "default_lookback_secs")]
    pub lookback_secs: u64,
}

fn default_volume_increase_factor() -> Decimal {
    Decimal::new(15, 1) // 1.5x
}
fn default_min_5min_volume() -> Decimal {
    Decimal::from(50_000)
}
fn default_token_age_threshold_hours() -> Decimal {
    Decimal::from(6)
}
fn default_lookback_secs() -> u64 {
    300 // 5 minutes
}

impl SurgeConfig {
    /// Lookback as a time span, `None` when it does not fit one
    pub fn lookback(&self) -> Option<Duration> {
        i64::try_from(self.lookback_secs)
            .ok()
            .and_then(Duration::try_seconds)
    }
}

impl Default for SurgeConfig {
    fn default() -> Self {
        Self {
            volume_increase_factor: default_volume_increase_factor(),
            min_5min_volume: default_min_5min_volume(),
            token_age_threshold_hours: default_token_age_threshold_hours(),
            lookback_secs: default_lookback_secs(),
        }
    }
}

/// Volume history retention
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// Observations kept per pair
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

/// Poll loop cadence
#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    /// Seconds between cycles
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_interval_secs() -> u64 {
    30
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

/// Where flagged pairs are reported
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Print flagged pairs to stdout
    #[serde(default = "default_true")]
    pub console: bool,

    /// Append flagged pairs as JSON lines to this file
    #[serde(default)]
    pub jsonl_path: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            console: true,
            jsonl_path: None,
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Serve Prometheus metrics on this port when set
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            metrics_port: None,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the poll loop cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.poll.interval_secs == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.surge.volume_increase_factor <= Decimal::ZERO {
            return Err(ConfigError::NonPositiveFactor(
                self.surge.volume_increase_factor,
            ));
        }
        if self.source.chain_id.trim().is_empty() {
            return Err(ConfigError::EmptyChain);
        }
        if self.surge.lookback().is_none() {
            return Err(ConfigError::LookbackOutOfRange(self.surge.lookback_secs));
        }
        Ok(())
    }
}
