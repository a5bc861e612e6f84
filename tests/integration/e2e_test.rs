//! End-to-end integration tests

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;
use surge_scout::config::Config;
use surge_scout::market::{PairFilter, PairSnapshot, SnapshotSource};
use surge_scout::poll::PollLoop;
use surge_scout::report::{CycleReport, JsonlSink, ReportSink};
use surge_scout::surge::{Severity, SurgeEvaluator};

/// In-memory market whose volumes the test moves between cycles
#[derive(Clone, Default)]
struct FakeMarket {
    pairs: Arc<Mutex<HashMap<String, PairSnapshot>>>,
    order: Arc<Mutex<Vec<String>>>,
    offline: Arc<Mutex<bool>>,
}

impl FakeMarket {
    fn upsert(&self, pair: PairSnapshot) {
        let mut order = self.order.lock().unwrap();
        if !order.contains(&pair.pair_address) {
            order.push(pair.pair_address.clone());
        }
        self.pairs
            .lock()
            .unwrap()
            .insert(pair.pair_address.clone(), pair);
    }

    fn set_volume(&self, address: &str, volume: Option<Decimal>) {
        if let Some(pair) = self.pairs.lock().unwrap().get_mut(address) {
            pair.volume_h1 = volume;
        }
    }

    fn set_offline(&self, offline: bool) {
        *self.offline.lock().unwrap() = offline;
    }
}

#[async_trait]
impl SnapshotSource for FakeMarket {
    async fn list_pairs(&self, filter: &PairFilter) -> anyhow::Result<Vec<PairSnapshot>> {
        if *self.offline.lock().unwrap() {
            anyhow::bail!("connection refused");
        }
        let order = self.order.lock().unwrap();
        let pairs = self.pairs.lock().unwrap();
        Ok(order
            .iter()
            .filter_map(|a| pairs.get(a).cloned())
            .filter(|p| filter.chain_id.is_empty() || p.chain_id == filter.chain_id)
            .collect())
    }

    async fn get_pair(
        &self,
        _chain_id: &str,
        pair_address: &str,
    ) -> anyhow::Result<Option<PairSnapshot>> {
        Ok(self.pairs.lock().unwrap().get(pair_address).cloned())
    }
}

#[derive(Clone, Default)]
struct RecordingSink {
    cycles: Arc<Mutex<Vec<CycleReport>>>,
}

#[async_trait]
impl ReportSink for RecordingSink {
    async fn report(&self, cycle: &CycleReport) -> anyhow::Result<()> {
        self.cycles.lock().unwrap().push(cycle.clone());
        Ok(())
    }
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

fn pair(address: &str, chain: &str, volume: Decimal, age_hours: i64) -> PairSnapshot {
    PairSnapshot {
        pair_address: address.to_string(),
        name: format!("{}/WBNB", address),
        chain_id: chain.to_string(),
        dex_id: "pancakeswap".to_string(),
        volume_h1: Some(volume),
        volume_h24: Some(volume * dec!(10)),
        price_change_h1: Some(dec!(-1)),
        price_change_h24: Some(dec!(-5)),
        created_at: Some(t0() - Duration::hours(age_hours)),
        url: Some(format!("https://dexscreener.com/{}/{}", chain, address)),
    }
}

fn filter() -> PairFilter {
    PairFilter {
        chain_id: "bsc".to_string(),
        queries: vec!["bnb".to_string()],
        watch: vec![],
    }
}

#[test]
fn test_config_example_loads() {
    let config: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();
    assert_eq!(config.source.chain_id, "bsc");
    assert_eq!(config.history.capacity, 20);
    assert_eq!(config.poll.interval_secs, 30);
    assert!(config.validate().is_ok());
}

#[tokio::test]
async fn test_surge_detected_across_cycles() {
    let market = FakeMarket::default();
    market.upsert(pair("0xmature", "bsc", dec!(40000), 48));
    market.upsert(pair("0xyoung", "bsc", dec!(40000), 2));
    market.upsert(pair("0xother", "ethereum", dec!(40000), 48));

    let sink = RecordingSink::default();
    let mut poller = PollLoop::new(
        market.clone(),
        sink.clone(),
        filter(),
        SurgeEvaluator::with_defaults(),
        20,
        StdDuration::from_secs(30),
    );

    // Sample every 30 seconds for ten minutes; volumes jump after minute 6
    for step in 0..=20 {
        let now = t0() + Duration::seconds(30 * step);
        if step == 12 {
            market.set_volume("0xmature", Some(dec!(100000)));
            market.set_volume("0xyoung", Some(dec!(100000)));
        }
        poller.run_cycle_at(now).await.unwrap();
    }

    let cycles = sink.cycles.lock().unwrap();
    assert_eq!(cycles.len(), 21);
    assert!(cycles.iter().all(|c| c.pairs_analyzed == 2));

    // Nothing before the jump
    assert!(cycles[..12].iter().all(|c| c.surges.is_empty()));

    let flagged: Vec<_> = cycles.iter().flat_map(|c| c.surges.iter()).collect();
    assert!(!flagged.is_empty());
    assert!(flagged.iter().all(|s| s.pair_address == "0xmature"));
    assert!(flagged.iter().all(|s| s.severity == Severity::Normal));
    assert!(flagged.iter().all(|s| s.delta_5m == dec!(60000)));
}

#[tokio::test]
async fn test_history_bounded_by_capacity() {
    let market = FakeMarket::default();
    market.upsert(pair("0xa", "bsc", dec!(1000), 48));

    let mut poller = PollLoop::new(
        market,
        RecordingSink::default(),
        filter(),
        SurgeEvaluator::with_defaults(),
        20,
        StdDuration::from_secs(30),
    );

    for step in 0..50 {
        poller
            .run_cycle_at(t0() + Duration::seconds(30 * step))
            .await
            .unwrap();
    }

    assert_eq!(poller.history().len("0xa"), 20);
    let oldest = poller.history().observations("0xa").next().unwrap();
    assert_eq!(oldest.timestamp, t0() + Duration::seconds(30 * 30));
}

#[tokio::test]
async fn test_baseline_drifts_with_capacity() {
    // With 20 samples at 30s spacing the oldest baseline is 9.5 minutes old,
    // so an early plateau followed by a jump is compared to the oldest sample.
    let market = FakeMarket::default();
    market.upsert(pair("0xa", "bsc", dec!(40000), 48));

    let sink = RecordingSink::default();
    let mut poller = PollLoop::new(
        market.clone(),
        sink.clone(),
        filter(),
        SurgeEvaluator::with_defaults(),
        20,
        StdDuration::from_secs(30),
    );

    for step in 0..30 {
        let volume = if step < 25 { dec!(40000) } else { dec!(100000) };
        market.set_volume("0xa", Some(volume));
        poller
            .run_cycle_at(t0() + Duration::seconds(30 * step))
            .await
            .unwrap();
    }

    let cycles = sink.cycles.lock().unwrap();
    assert!(cycles[25..].iter().all(|c| c.surges.len() == 1));
}

#[tokio::test]
async fn test_outage_skips_cycles_without_losing_history() {
    let market = FakeMarket::default();
    market.upsert(pair("0xa", "bsc", dec!(40000), 48));

    let sink = RecordingSink::default();
    let mut poller = PollLoop::new(
        market.clone(),
        sink.clone(),
        filter(),
        SurgeEvaluator::with_defaults(),
        20,
        StdDuration::from_secs(30),
    );

    poller.run_cycle_at(t0()).await.unwrap();

    market.set_offline(true);
    assert!(poller
        .run_cycle_at(t0() + Duration::minutes(3))
        .await
        .is_err());

    market.set_offline(false);
    market.set_volume("0xa", Some(dec!(100000)));
    let report = poller
        .run_cycle_at(t0() + Duration::minutes(6))
        .await
        .unwrap();

    assert_eq!(report.surges.len(), 1);
    assert_eq!(sink.cycles.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_jsonl_sink_in_loop() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("surges.jsonl");

    let market = FakeMarket::default();
    market.upsert(pair("0xa", "bsc", dec!(40000), 48));

    let mut poller = PollLoop::new(
        market.clone(),
        JsonlSink::new(&path),
        filter(),
        SurgeEvaluator::with_defaults(),
        20,
        StdDuration::from_secs(30),
    );

    poller.run_cycle_at(t0()).await.unwrap();
    market.set_volume("0xa", Some(dec!(100000)));
    poller
        .run_cycle_at(t0() + Duration::minutes(6))
        .await
        .unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 1);
    let record: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
    assert_eq!(record["pair_address"], "0xa");
    assert_eq!(record["chain"], "bsc");
}
