//! Integration tests for the history store and evaluator together

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use surge_scout::market::PairSnapshot;
use surge_scout::surge::{HistoryStore, SurgeEvaluator};

fn t(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes)
}

fn snapshot(volume: Option<Decimal>, created_at: Option<DateTime<Utc>>) -> PairSnapshot {
    PairSnapshot {
        pair_address: "0xpair".to_string(),
        name: "MEME/WBNB".to_string(),
        chain_id: "bsc".to_string(),
        dex_id: "pancakeswap".to_string(),
        volume_h1: volume,
        volume_h24: None,
        price_change_h1: None,
        price_change_h24: None,
        created_at,
        url: None,
    }
}

#[test]
fn test_oldest_sample_is_baseline() {
    let mut history = HistoryStore::with_defaults();
    history.record("0xpair", t(0), dec!(100));
    history.record("0xpair", t(2), dec!(200));
    history.record("0xpair", t(4), dec!(300));

    // now = t9, cutoff = t4
    assert_eq!(history.find_as_of("0xpair", t(9) - Duration::minutes(5)), Some(dec!(100)));
}

#[test]
fn test_twenty_first_record_evicts_first() {
    let mut history = HistoryStore::with_defaults();
    for i in 0..21 {
        history.record("0xpair", t(i), Decimal::from(i + 1));
    }

    assert_eq!(history.len("0xpair"), 20);
    assert!(history.observations("0xpair").all(|o| o.volume != dec!(1)));
    assert_ne!(history.find_as_of("0xpair", t(100)), Some(dec!(1)));
}

#[test]
fn test_age_gate_holds_for_any_volume() {
    let evaluator = SurgeEvaluator::with_defaults();
    let mut history = HistoryStore::with_defaults();
    history.record("0xpair", t(0), dec!(1));
    history.record("0xpair", t(10), dec!(1000000000));

    for age_minutes in [0, 30, 180, 359, 360] {
        let created = t(10) - Duration::minutes(age_minutes);
        let verdict = evaluator.evaluate(&snapshot(Some(dec!(1000000000)), Some(created)), &history, t(10));
        assert!(!verdict.core, "age {}m flagged", age_minutes);
    }

    let created = t(10) - Duration::minutes(361);
    let verdict = evaluator.evaluate(&snapshot(Some(dec!(1000000000)), Some(created)), &history, t(10));
    assert!(verdict.core);
}

#[test]
fn test_repeat_evaluation_is_stable() {
    let evaluator = SurgeEvaluator::with_defaults();
    let mut history = HistoryStore::with_defaults();
    history.record("0xpair", t(0), dec!(40000));
    history.record("0xpair", t(6), dec!(100000));

    let snap = snapshot(Some(dec!(100000)), Some(t(-600)));
    let first = evaluator.evaluate(&snap, &history, t(6));
    let second = evaluator.evaluate(&snap, &history, t(6));
    assert_eq!(first, second);
    assert!(first.core);
}
