//! Merging of overlapping search results into one pair set

use super::PairSnapshot;
use std::collections::HashSet;

/// Insertion-ordered set of snapshots keyed by pair address
///
/// The first snapshot seen for an address is kept; later duplicates from
/// other queries in the same cycle are dropped.
#[derive(Debug, Default)]
pub struct PairUniverse {
    seen: HashSet<String>,
    pairs: Vec<PairSnapshot>,
}

impl PairUniverse {
    /// Create an empty universe
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a snapshot, returning false if its address was already present
    pub fn insert(&mut self, pair: PairSnapshot) -> bool {
        if pair.pair_address.is_empty() || self.seen.contains(&pair.pair_address) {
            return false;
        }
        self.seen.insert(pair.pair_address.clone());
        self.pairs.push(pair);
        true
    }

    /// Add every snapshot from an iterator, returning how many were new
    pub fn extend(&mut self, pairs: impl IntoIterator<Item = PairSnapshot>) -> usize {
        let mut added = 0;
        for pair in pairs {
            if self.insert(pair) {
                added += 1;
            }
        }
        added
    }

    /// Check whether an address is already present
    pub fn contains(&self, pair_address: &str) -> bool {
        self.seen.contains(pair_address)
    }

    /// Number of distinct pairs
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True when no pairs were collected
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Consume the universe, yielding pairs in first-seen order
    pub fn into_pairs(self) -> Vec<PairSnapshot> {
        self.pairs
    }
}
