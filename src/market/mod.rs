//! Market data module
//!
//! Pair snapshots and the sources that produce them. The detector core only
//! sees the [`SnapshotSource`] trait; DexScreener is the shipped implementation.

mod dexscreener;
mod universe;

pub use dexscreener::{DexScreenerClient, DexScreenerConfig, SourceError, DEXSCREENER_API_URL};
pub use universe::PairUniverse;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Point-in-time view of a trading pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairSnapshot {
    /// Pair contract address, used as the pair id
    pub pair_address: String,
    /// Display name as `BASE/QUOTE`
    pub name: String,
    /// Chain identifier (e.g. "bsc")
    pub chain_id: String,
    /// Exchange identifier (e.g. "pancakeswap")
    pub dex_id: String,
    /// Rolling 1-hour traded volume
    pub volume_h1: Option<Decimal>,
    /// Rolling 24-hour traded volume
    pub volume_h24: Option<Decimal>,
    /// 1-hour price change in percent
    pub price_change_h1: Option<Decimal>,
    /// 24-hour price change in percent
    pub price_change_h24: Option<Decimal>,
    /// When the pair was created
    pub created_at: Option<DateTime<Utc>>,
    /// Detail page
    pub url: Option<String>,
}

/// Which pairs a source should return
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairFilter {
    /// Only pairs on this chain
    pub chain_id: String,
    /// Broad search terms, one upstream query each
    pub queries: Vec<String>,
    /// Pair addresses that must be included even if no query matched them
    pub watch: Vec<String>,
}

/// Trait for market data providers
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Current snapshots matching the filter, de-duplicated by pair address
    async fn list_pairs(&self, filter: &PairFilter) -> anyhow::Result<Vec<PairSnapshot>>;
    /// Look up a single pair
    async fn get_pair(
        &self,
        chain_id: &str,
        pair_address: &str,
    ) -> anyhow::Result<Option<PairSnapshot>>;
}
