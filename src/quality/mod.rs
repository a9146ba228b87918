//! Quality estimation
//!
//! Derives a per-item competence score from the history ledger alone,
//! independent of the `active`/`required` flags:
//!
//! - Every attempted pair `(a, b)` with best score `B` adds `1/B` ("badness")
//!   to both `a` and `b`, and counts one pair seen for each
//! - `quality = pairs_seen / badness`, a harmonic mean of the best scores of
//!   every pair the item has been tested in
//! - Items never attempted have `quality = 0`
//!
//! The table is recomputed from scratch on every call; nothing is maintained
//! incrementally, so it cannot drift from the ledger.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::history::HistoryLedger;
use crate::items::ItemStore;
use crate::types::{ItemId, MIN_SCORE};

// ==================== Data Structures ====================

/// Quality and pair count for one item
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemQuality {
    pub quality: f64,
    pub pairs_seen: u32,
}

/// Quality of every item in a store at one point in time
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QualityTable {
    entries: HashMap<ItemId, ItemQuality>,
}

impl QualityTable {
    /// Quality of `name`, 0 for items the table does not know
    pub fn quality(&self, name: &str) -> f64 {
        self.entries.get(name).map_or(0.0, |entry| entry.quality)
    }

    pub fn pairs_seen(&self, name: &str) -> u32 {
        self.entries.get(name).map_or(0, |entry| entry.pairs_seen)
    }

    pub fn get(&self, name: &str) -> Option<&ItemQuality> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ItemQuality)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ==================== Core Functions ====================

/// Harmonic-mean quality from a pair count and accumulated inverse best scores
pub fn compute_quality(pairs_seen: u32, badness: f64) -> f64 {
    if badness != 0.0 {
        pairs_seen as f64 / badness
    } else {
        0.0
    }
}

/// Stateless estimator over a store and ledger snapshot
pub struct QualityEstimator;

impl QualityEstimator {
    /// Compute the quality table for every item in `store`.
    ///
    /// Pairs naming an item the store does not hold contribute nothing to that
    /// item but still count for their other member.
    pub fn estimate(store: &ItemStore, ledger: &HistoryLedger) -> QualityTable {
        let mut accum: HashMap<&str, (f64, u32)> = store
            .iter()
            .map(|item| (item.name.as_str(), (0.0, 0)))
            .collect();

        for (pair, history) in ledger.iter() {
            let inverse = 1.0 / history.best().max(MIN_SCORE) as f64;
            for name in [pair.first(), pair.second()] {
                if let Some((badness, seen)) = accum.get_mut(name) {
                    *badness += inverse;
                    *seen += 1;
                }
            }
        }

        let entries = accum
            .into_iter()
            .map(|(name, (badness, pairs_seen))| {
                (
                    name.to_string(),
                    ItemQuality {
                        quality: compute_quality(pairs_seen, badness),
                        pairs_seen,
                    },
                )
            })
            .collect();

        QualityTable { entries }
    }

    /// Recompute quality and write it back onto the store's items
    pub fn refresh(store: &mut ItemStore, ledger: &HistoryLedger) -> QualityTable {
        let table = Self::estimate(store, ledger);
        for (name, entry) in table.iter() {
            store.set_quality(name, entry.quality, entry.pairs_seen);
        }
        table
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PairKey;

    const EPS: f64 = 1e-9;

    fn setup(names: &[&str]) -> (ItemStore, HistoryLedger) {
        let mut store = ItemStore::new();
        for name in names {
            store.add_item(*name).unwrap();
        }
        (store, HistoryLedger::new())
    }

    #[test]
    fn test_compute_quality_zero_badness() {
        assert_eq!(compute_quality(0, 0.0), 0.0);
        assert!((compute_quality(2, 0.6) - 10.0 / 3.0).abs() < EPS);
    }

    #[test]
    fn test_unattempted_items_have_zero_quality() {
        let (store, mut ledger) = setup(&["C", "G", "D"]);
        ledger.record(PairKey::new("C", "G").unwrap(), 5);

        let table = QualityEstimator::estimate(&store, &ledger);
        assert_eq!(table.quality("D"), 0.0);
        assert_eq!(table.pairs_seen("D"), 0);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_harmonic_mean_of_best_scores() {
        let (store, mut ledger) = setup(&["C", "G", "D"]);
        ledger.record(PairKey::new("C", "G").unwrap(), 10);
        ledger.record(PairKey::new("C", "D").unwrap(), 2);

        let table = QualityEstimator::estimate(&store, &ledger);
        // C: 2 / (1/10 + 1/2)
        assert!((table.quality("C") - 2.0 / 0.6).abs() < EPS);
        assert!((table.quality("G") - 10.0).abs() < EPS);
        assert!((table.quality("D") - 2.0).abs() < EPS);
        assert_eq!(table.pairs_seen("C"), 2);
    }

    #[test]
    fn test_equal_best_scores_collapse_to_constant() {
        let (store, mut ledger) = setup(&["A", "B", "C", "D"]);
        for other in ["B", "C", "D"] {
            ledger.record(PairKey::new("A", other).unwrap(), 7);
        }

        let table = QualityEstimator::estimate(&store, &ledger);
        assert!((table.quality("A") - 7.0).abs() < EPS);
        assert_eq!(table.pairs_seen("A"), 3);
    }

    #[test]
    fn test_quality_ignores_flags() {
        let (mut store, mut ledger) = setup(&["C", "G"]);
        ledger.record(PairKey::new("C", "G").unwrap(), 9);
        store.set_active("C", false).unwrap();
        store.set_required("G", true).unwrap();

        let table = QualityEstimator::estimate(&store, &ledger);
        assert!((table.quality("C") - 9.0).abs() < EPS);
    }

    #[test]
    fn test_refresh_writes_back() {
        let (mut store, mut ledger) = setup(&["C", "G"]);
        ledger.record(PairKey::new("C", "G").unwrap(), 4);

        QualityEstimator::refresh(&mut store, &ledger);
        let c = store.get("C").unwrap();
        assert!((c.quality - 4.0).abs() < EPS);
        assert_eq!(c.pairs_seen, 1);
    }
}
