//! Volume surge evaluation
//!
//! A pair is flagged when its rolling 1-hour volume grew sharply against a
//! baseline sample taken at least one lookback window ago. Young pairs are
//! skipped entirely: their rolling volume ramps up naturally after launch.

use super::{HistoryStore, SurgeVerdict};
use crate::config::SurgeConfig;
use crate::market::PairSnapshot;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const MILLIS_PER_HOUR: Decimal = dec!(3600000);

/// Applies the surge rule to pair snapshots
#[derive(Debug, Clone)]
pub struct SurgeEvaluator {
    config: SurgeConfig,
    lookback: Option<Duration>,
}

impl SurgeEvaluator {
    /// Create an evaluator with the given thresholds
    ///
    /// A lookback too large for a time span disables the core condition.
    pub fn new(config: SurgeConfig) -> Self {
        let lookback = config.lookback();
        Self { config, lookback }
    }

    /// Create an evaluator with default thresholds
    pub fn with_defaults() -> Self {
        Self::new(SurgeConfig::default())
    }

    /// Thresholds in use
    pub fn config(&self) -> &SurgeConfig {
        &self.config
    }

    /// Evaluate one pair against its history at time `now`
    ///
    /// The current sample is expected to be recorded already; it can never
    /// serve as its own baseline because the cutoff lies in the past.
    pub fn evaluate(
        &self,
        snapshot: &PairSnapshot,
        history: &HistoryStore,
        now: DateTime<Utc>,
    ) -> SurgeVerdict {
        let token_age_hours = token_age_hours(snapshot.created_at, now);

        let (core, delta_5m) = if token_age_hours > self.config.token_age_threshold_hours {
            self.core_condition(snapshot, history, now)
        } else {
            (false, Decimal::ZERO)
        };

        let auxiliary = auxiliary_condition(snapshot.price_change_h1, snapshot.price_change_h24);

        tracing::trace!(
            pair = %snapshot.pair_address,
            %token_age_hours,
            %delta_5m,
            core,
            auxiliary,
            "Evaluated pair"
        );

        SurgeVerdict {
            core,
            auxiliary,
            delta_5m,
            token_age_hours,
        }
    }

    /// Volume surge test against the baseline sample
    ///
    /// Returns the verdict and the computed delta; the delta is zero when no
    /// baseline or current volume is available.
    fn core_condition(
        &self,
        snapshot: &PairSnapshot,
        history: &HistoryStore,
        now: DateTime<Utc>,
    ) -> (bool, Decimal) {
        let Some(cutoff) = self.lookback.and_then(|l| now.checked_sub_signed(l)) else {
            return (false, Decimal::ZERO);
        };
        let baseline = history.find_as_of(&snapshot.pair_address, cutoff);

        let (current, old) = match (snapshot.volume_h1, baseline) {
            (Some(current), Some(old)) => (current, old),
            _ => return (false, Decimal::ZERO),
        };

        // Out-of-range upstream volumes disable the rule instead of overflowing
        let (Some(delta), Some(threshold)) = (
            current.checked_sub(old),
            old.checked_mul(self.config.volume_increase_factor),
        ) else {
            return (false, Decimal::ZERO);
        };

        let surged =
            old > Decimal::ZERO && current > threshold && delta > self.config.min_5min_volume;

        (surged, delta)
    }
}

impl Default for SurgeEvaluator {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Hours elapsed since creation, zero when the creation time is unknown
pub fn token_age_hours(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Decimal {
    match created_at {
        Some(created) => Decimal::from((now - created).num_milliseconds()) / MILLIS_PER_HOUR,
        None => Decimal::ZERO,
    }
}

/// Price is rising and accelerating relative to the daily trend
pub fn auxiliary_condition(change_h1: Option<Decimal>, change_h24: Option<Decimal>) -> bool {
    match (change_h1, change_h24) {
        (Some(h1), Some(h24)) => h1 > h24 && h1 > Decimal::ZERO,
        _ => false,
    }
}
