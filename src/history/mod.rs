//! Attempt history ledger
//!
//! Append-only record of attempt scores per pair. Each pair caches its best
//! score, `max(1, max(scores))`, which only ever grows as attempts are added.
//! The full record list is retained for later trend analysis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{clamp_score, PairKey, MIN_SCORE};

// ==================== Data Structures ====================

/// One recorded attempt; immutable once stored
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Clamped score (>= 1), e.g. chord changes completed in the interval
    pub score: u32,
    pub timestamp: DateTime<Utc>,
}

/// Ordered attempts for one pair plus the cached best score
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairHistory {
    records: Vec<AttemptRecord>,
    best: u32,
}

impl Default for PairHistory {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            best: MIN_SCORE,
        }
    }
}

impl PairHistory {
    /// Rebuild a history from persisted parts; `best` is taken as given until
    /// [`HistoryLedger::rebuild_best`] runs
    pub(crate) fn from_parts(records: Vec<AttemptRecord>, best: Option<u32>) -> Self {
        Self {
            records,
            best: best.unwrap_or(MIN_SCORE),
        }
    }

    fn push(&mut self, record: AttemptRecord) {
        self.best = self.best.max(record.score);
        self.records.push(record);
    }

    /// `max(1, max over records)` computed from scratch
    pub fn recompute_best(&self) -> u32 {
        self.records
            .iter()
            .map(|record| record.score)
            .fold(MIN_SCORE, u32::max)
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn records(&self) -> &[AttemptRecord] {
        &self.records
    }

    pub fn latest(&self) -> Option<&AttemptRecord> {
        self.records.last()
    }

    pub fn attempt_count(&self) -> usize {
        self.records.len()
    }
}

/// Per-pair attempt ledger, iterated in canonical pair order
#[derive(Clone, Debug, Default)]
pub struct HistoryLedger {
    pairs: BTreeMap<PairKey, PairHistory>,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an attempt stamped with the current time; returns the stored score
    pub fn record(&mut self, pair: PairKey, score: i64) -> u32 {
        self.record_at(pair, score, Utc::now())
    }

    /// Append an attempt with an explicit timestamp; returns the stored score
    pub fn record_at(&mut self, pair: PairKey, score: i64, timestamp: DateTime<Utc>) -> u32 {
        let score = clamp_score(score);
        self.pairs
            .entry(pair)
            .or_default()
            .push(AttemptRecord { score, timestamp });
        score
    }

    /// Cached best score, `None` if the pair was never attempted
    pub fn best_for(&self, pair: &PairKey) -> Option<u32> {
        self.pairs.get(pair).map(PairHistory::best)
    }

    /// Recompute the cached best of one pair from its records.
    ///
    /// Returns the new value, or `None` for a pair the ledger does not hold.
    pub fn rebuild_best(&mut self, pair: &PairKey) -> Option<u32> {
        let history = self.pairs.get_mut(pair)?;
        history.best = history.recompute_best();
        Some(history.best)
    }

    pub fn get(&self, pair: &PairKey) -> Option<&PairHistory> {
        self.pairs.get(pair)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PairKey, &PairHistory)> {
        self.pairs.iter()
    }

    pub fn pair_keys(&self) -> impl Iterator<Item = &PairKey> {
        self.pairs.keys()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub(crate) fn insert_history(&mut self, pair: PairKey, history: PairHistory) -> bool {
        self.pairs.insert(pair, history).is_none()
    }

    /// Symmetric best-score matrix over `items`, in the given order
    pub fn best_table(&self, items: &[&str]) -> BestTable {
        let cells = items
            .iter()
            .map(|row| {
                items
                    .iter()
                    .map(|col| {
                        PairKey::new(*row, *col)
                            .ok()
                            .and_then(|pair| self.best_for(&pair))
                    })
                    .collect()
            })
            .collect();

        BestTable {
            items: items.iter().map(|name| name.to_string()).collect(),
            cells,
        }
    }
}

/// Square view of best scores; the diagonal and unattempted pairs are `None`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestTable {
    pub items: Vec<String>,
    pub cells: Vec<Vec<Option<u32>>>,
}

impl BestTable {
    pub fn get(&self, row: &str, col: &str) -> Option<u32> {
        let r = self.items.iter().position(|name| name == row)?;
        let c = self.items.iter().position(|name| name == col)?;
        self.cells[r][c]
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn pair(a: &str, b: &str) -> PairKey {
        PairKey::new(a, b).unwrap()
    }

    #[test]
    fn test_unattempted_pair_has_no_best() {
        let ledger = HistoryLedger::new();
        assert_eq!(ledger.best_for(&pair("C", "G")), None);
    }

    #[test]
    fn test_record_clamps_score() {
        let mut ledger = HistoryLedger::new();
        assert_eq!(ledger.record(pair("C", "G"), 0), 1);
        assert_eq!(ledger.record(pair("C", "G"), -3), 1);
        assert_eq!(ledger.best_for(&pair("C", "G")), Some(1));
    }

    #[test]
    fn test_best_is_monotonic() {
        let mut ledger = HistoryLedger::new();
        let key = pair("C", "G");

        ledger.record(key.clone(), 12);
        ledger.record(key.clone(), 30);
        ledger.record(key.clone(), 4);

        assert_eq!(ledger.best_for(&key), Some(30));
        assert_eq!(ledger.get(&key).unwrap().attempt_count(), 3);
        assert_eq!(ledger.get(&key).unwrap().latest().unwrap().score, 4);
    }

    #[test]
    fn test_record_is_order_independent_on_key() {
        let mut ledger = HistoryLedger::new();
        ledger.record(pair("G", "C"), 8);
        assert_eq!(ledger.best_for(&pair("C", "G")), Some(8));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_rebuild_best_repairs_stale_value() {
        let mut ledger = HistoryLedger::new();
        let key = pair("A", "E");
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let records = vec![
            AttemptRecord { score: 17, timestamp: at },
            AttemptRecord { score: 23, timestamp: at },
        ];
        ledger.insert_history(key.clone(), PairHistory::from_parts(records, Some(99)));
        assert_eq!(ledger.best_for(&key), Some(99));

        assert_eq!(ledger.rebuild_best(&key), Some(23));
        assert_eq!(ledger.best_for(&key), Some(23));
    }

    #[test]
    fn test_rebuild_best_empty_and_unknown() {
        let mut ledger = HistoryLedger::new();
        let key = pair("A", "D");
        ledger.insert_history(key.clone(), PairHistory::from_parts(Vec::new(), None));
        assert_eq!(ledger.rebuild_best(&key), Some(1));
        assert_eq!(ledger.rebuild_best(&pair("A", "B")), None);
    }

    #[test]
    fn test_best_table_is_symmetric() {
        let mut ledger = HistoryLedger::new();
        ledger.record(pair("C", "G"), 10);
        ledger.record(pair("C", "D"), 2);

        let table = ledger.best_table(&["C", "G", "D"]);
        assert_eq!(table.get("C", "G"), Some(10));
        assert_eq!(table.get("G", "C"), Some(10));
        assert_eq!(table.get("D", "C"), Some(2));
        assert_eq!(table.get("G", "D"), None);
        assert_eq!(table.get("C", "C"), None);
        assert_eq!(table.cells[0][0], None);
    }
}
