//! Bounded per-pair volume history
//!
//! Each pair keeps a fixed-capacity ring of (timestamp, rolling volume)
//! observations. Observations are appended in sampling order, so every ring
//! is ordered by non-decreasing timestamp.

use super::Observation;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::{HashMap, VecDeque};

/// Default number of observations retained per pair
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// Volume history for every pair seen so far
#[derive(Debug, Clone)]
pub struct HistoryStore {
    capacity: usize,
    pairs: HashMap<String, VecDeque<Observation>>,
}

impl HistoryStore {
    /// Create a store retaining at most `capacity` observations per pair
    ///
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            pairs: HashMap::new(),
        }
    }

    /// Create a store with the default capacity
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }

    /// Append an observation, evicting the oldest one when the ring is full
    pub fn record(&mut self, pair_id: &str, timestamp: DateTime<Utc>, volume: Decimal) {
        let capacity = self.capacity;
        let ring = self
            .pairs
            .entry(pair_id.to_string())
            .or_insert_with(|| VecDeque::with_capacity(capacity));

        if ring.len() >= capacity {
            ring.pop_front();
        }
        ring.push_back(Observation { timestamp, volume });
    }

    /// Volume of the earliest retained observation taken at or before `cutoff`
    ///
    /// Scans oldest-first and returns the first match, so the baseline is the
    /// oldest sample that is old enough rather than the one closest to the
    /// cutoff.
    pub fn find_as_of(&self, pair_id: &str, cutoff: DateTime<Utc>) -> Option<Decimal> {
        self.pairs
            .get(pair_id)?
            .iter()
            .find(|obs| obs.timestamp <= cutoff)
            .map(|obs| obs.volume)
    }

    /// Observations for a pair, oldest first
    pub fn observations(&self, pair_id: &str) -> impl Iterator<Item = &Observation> {
        self.pairs.get(pair_id).into_iter().flatten()
    }

    /// Number of observations held for a pair
    pub fn len(&self, pair_id: &str) -> usize {
        self.pairs.get(pair_id).map_or(0, VecDeque::len)
    }

    /// Number of pairs with at least one observation
    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    /// True when nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Maximum observations retained per pair
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}
