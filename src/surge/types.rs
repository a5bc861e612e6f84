//! Surge detection types

use crate::market::PairSnapshot;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One recorded rolling-volume sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// When the sample was taken
    pub timestamp: DateTime<Utc>,
    /// Rolling 1-hour volume at that time
    pub volume: Decimal,
}

/// How strongly a flagged pair is signalled
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Volume surge only
    Normal,
    /// Volume surge with accelerating price
    High,
}

impl Severity {
    /// Fire markers used in console output
    pub fn marker(&self) -> &'static str {
        match self {
            Severity::Normal => "🔥🔥🔥",
            Severity::High => "🔥🔥🔥🔥🔥",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Normal => write!(f, "normal"),
            Severity::High => write!(f, "high"),
        }
    }
}

/// Outcome of evaluating one pair in one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurgeVerdict {
    /// Volume surged over the lookback window
    pub core: bool,
    /// 1h price change is positive and above the 24h change
    pub auxiliary: bool,
    /// Rolling volume added since the baseline sample
    pub delta_5m: Decimal,
    /// Hours since the pair was created
    pub token_age_hours: Decimal,
}

impl SurgeVerdict {
    /// Only the core condition flags a pair
    pub fn flagged(&self) -> bool {
        self.core
    }

    /// High when the auxiliary condition confirms the surge
    pub fn severity(&self) -> Severity {
        if self.core && self.auxiliary {
            Severity::High
        } else {
            Severity::Normal
        }
    }
}

/// A flagged pair as handed to reporting sinks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurgeReport {
    pub pair_address: String,
    pub pair_name: String,
    pub chain: String,
    pub dex: String,
    pub volume_h1: Option<Decimal>,
    pub volume_h24: Option<Decimal>,
    pub price_change_h1: Option<Decimal>,
    pub price_change_h24: Option<Decimal>,
    pub url: Option<String>,
    pub severity: Severity,
    pub token_age_hours: Decimal,
    pub delta_5m: Decimal,
    pub detected_at: DateTime<Utc>,
}

impl SurgeReport {
    /// Build a report from a snapshot and its verdict
    pub fn new(snapshot: &PairSnapshot, verdict: &SurgeVerdict, detected_at: DateTime<Utc>) -> Self {
        Self {
            pair_address: snapshot.pair_address.clone(),
            pair_name: snapshot.name.clone(),
            chain: snapshot.chain_id.clone(),
            dex: snapshot.dex_id.clone(),
            volume_h1: snapshot.volume_h1,
            volume_h24: snapshot.volume_h24,
            price_change_h1: snapshot.price_change_h1,
            price_change_h24: snapshot.price_change_h24,
            url: snapshot.url.clone(),
            severity: verdict.severity(),
            token_age_hours: verdict.token_age_hours,
            delta_5m: verdict.delta_5m,
            detected_at,
        }
    }
}
