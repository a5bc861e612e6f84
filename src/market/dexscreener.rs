//! DexScreener API client
//!
//! Builds the per-cycle pair universe from several broad search queries plus
//! an explicit watch list. DexScreener payloads are loosely typed: numbers
//! arrive as JSON numbers or strings and any field may be missing, so raw
//! values are parsed leniently and anything unparseable becomes `None`.

use super::{PairFilter, PairSnapshot, PairUniverse, SnapshotSource};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// DexScreener API base URL
pub const DEXSCREENER_API_URL: &str = "https://api.dexscreener.com/latest/dex";

/// Errors raised while talking to DexScreener
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("DexScreener returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("all {attempted} upstream requests failed")]
    Unavailable { attempted: usize },
}

/// Configuration for the DexScreener client
#[derive(Debug, Clone)]
pub struct DexScreenerConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Pause between consecutive requests within one cycle
    pub query_delay: Duration,
}

impl Default for DexScreenerConfig {
    fn default() -> Self {
        Self {
            base_url: DEXSCREENER_API_URL.to_string(),
            timeout: Duration::from_secs(10),
            query_delay: Duration::from_millis(500),
        }
    }
}

/// Client for the DexScreener public API
pub struct DexScreenerClient {
    config: DexScreenerConfig,
    client: Client,
}

impl DexScreenerClient {
    /// Create a client with default configuration
    pub fn new() -> anyhow::Result<Self> {
        Self::with_config(DexScreenerConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: DexScreenerConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self { config, client })
    }

    /// Run one search query
    ///
    /// With no query the chain id itself is used as the search term.
    pub async fn search(
        &self,
        chain_id: &str,
        query: Option<&str>,
    ) -> Result<Vec<PairSnapshot>, SourceError> {
        let url = format!("{}/search", self.config.base_url);
        let params: Vec<(&str, &str)> = match query {
            Some(q) => vec![("q", q), ("chainId", chain_id)],
            None => vec![("q", chain_id)],
        };

        tracing::debug!(url = %url, query = ?query, chain = chain_id, "Searching DexScreener pairs");

        let response: DexPairsResponse = self.get_json(&url, &params).await?;
        Ok(response.into_snapshots())
    }

    /// Fetch every pair record DexScreener returns for an address
    pub async fn fetch_pair(
        &self,
        chain_id: &str,
        pair_address: &str,
    ) -> Result<Vec<PairSnapshot>, SourceError> {
        let url = format!("{}/pairs/{}/{}", self.config.base_url, chain_id, pair_address);

        tracing::debug!(url = %url, "Fetching DexScreener pair");

        let response: DexPairsResponse = self.get_json(&url, &[]).await?;
        Ok(response.into_snapshots())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        let response = self.client.get(url).query(params).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status { status, body });
        }

        Ok(response.json().await?)
    }

    async fn pause(&self) {
        if !self.config.query_delay.is_zero() {
            tokio::time::sleep(self.config.query_delay).await;
        }
    }
}

#[async_trait]
impl SnapshotSource for DexScreenerClient {
    async fn list_pairs(&self, filter: &PairFilter) -> anyhow::Result<Vec<PairSnapshot>> {
        let mut universe = PairUniverse::new();
        let mut attempted = 0usize;
        let mut failed = 0usize;

        let queries: Vec<Option<&str>> = if filter.queries.is_empty() {
            vec![None]
        } else {
            filter.queries.iter().map(|q| Some(q.as_str())).collect()
        };

        for (i, query) in queries.into_iter().enumerate() {
            if i > 0 {
                self.pause().await;
            }
            attempted += 1;

            match self.search(&filter.chain_id, query).await {
                Ok(pairs) => {
                    let added = universe.extend(
                        pairs
                            .into_iter()
                            .filter(|p| on_chain(p, &filter.chain_id)),
                    );
                    tracing::debug!(query = ?query, added, total = universe.len(), "Merged search results");
                }
                Err(e) => {
                    failed += 1;
                    tracing::warn!(query = ?query, error = %e, "DexScreener search failed");
                }
            }
        }

        for address in &filter.watch {
            if universe.contains(address) {
                continue;
            }
            attempted += 1;

            match self.fetch_pair(&filter.chain_id, address).await {
                Ok(pairs) => {
                    let added = universe.extend(
                        pairs
                            .into_iter()
                            .filter(|p| on_chain(p, &filter.chain_id)),
                    );
                    if added > 0 {
                        tracing::info!(pair = %address, "Added watched pair");
                    } else {
                        tracing::warn!(pair = %address, chain = %filter.chain_id, "Watched pair not found on chain");
                    }
                }
                Err(e) => {
                    failed += 1;
                    tracing::warn!(pair = %address, error = %e, "Failed to fetch watched pair");
                }
            }
        }

        if attempted > 0 && failed == attempted {
            return Err(SourceError::Unavailable { attempted }.into());
        }

        Ok(universe.into_pairs())
    }

    async fn get_pair(
        &self,
        chain_id: &str,
        pair_address: &str,
    ) -> anyhow::Result<Option<PairSnapshot>> {
        let pairs = self.fetch_pair(chain_id, pair_address).await?;

        let exact = pairs
            .iter()
            .position(|p| p.pair_address.eq_ignore_ascii_case(pair_address));
        Ok(match exact {
            Some(idx) => pairs.into_iter().nth(idx),
            None => pairs.into_iter().next(),
        })
    }
}

fn on_chain(pair: &PairSnapshot, chain_id: &str) -> bool {
    chain_id.is_empty() || pair.chain_id == chain_id
}

/// Envelope shared by the search and pair endpoints
#[derive(Debug, Default, Deserialize)]
struct DexPairsResponse {
    #[serde(default)]
    pairs: Option<Vec<DexPair>>,
}

impl DexPairsResponse {
    fn into_snapshots(self) -> Vec<PairSnapshot> {
        self.pairs
            .unwrap_or_default()
            .into_iter()
            .filter_map(DexPair::into_snapshot)
            .collect()
    }
}

/// Raw pair record
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DexPair {
    chain_id: Option<String>,
    dex_id: Option<String>,
    url: Option<String>,
    pair_address: Option<String>,
    base_token: Option<DexToken>,
    quote_token: Option<DexToken>,
    /// Windowed volumes, e.g. `{"h1": 1234.5, "h24": 99999}`
    volume: Option<Value>,
    /// Windowed price changes in percent
    price_change: Option<Value>,
    /// Creation time in unix milliseconds
    pair_created_at: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct DexToken {
    symbol: Option<String>,
}

impl DexPair {
    /// Convert to a snapshot; records without an address are dropped
    fn into_snapshot(self) -> Option<PairSnapshot> {
        let pair_address = self.pair_address.filter(|a| !a.is_empty())?;

        let symbol = |t: &Option<DexToken>| {
            t.as_ref()
                .and_then(|t| t.symbol.clone())
                .unwrap_or_else(|| "N/A".to_string())
        };
        let name = format!("{}/{}", symbol(&self.base_token), symbol(&self.quote_token));

        Some(PairSnapshot {
            pair_address,
            name,
            chain_id: self.chain_id.unwrap_or_default(),
            dex_id: self.dex_id.unwrap_or_default(),
            volume_h1: window_value(&self.volume, "h1"),
            volume_h24: window_value(&self.volume, "h24"),
            price_change_h1: window_value(&self.price_change, "h1"),
            price_change_h24: window_value(&self.price_change, "h24"),
            created_at: self.pair_created_at.as_ref().and_then(parse_millis),
            url: self.url,
        })
    }
}

fn window_value(windows: &Option<Value>, key: &str) -> Option<Decimal> {
    windows.as_ref()?.get(key).and_then(parse_decimal)
}

/// Parse a JSON number or numeric string
pub(crate) fn parse_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Parse unix milliseconds given as a number or numeric string
fn parse_millis(value: &Value) -> Option<DateTime<Utc>> {
    let millis = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    Utc.timestamp_millis_opt(millis).single()
}
