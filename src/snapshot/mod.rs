//! Serializable practice state
//!
//! `PracticeSnapshot` is the structure handed to the persistence layer.
//! Restoring validates item and pair references, then recomputes every
//! cached best score and the quality table, so a stale or missing `best`
//! in the stored form can never leak into scheduling.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ItemConfig;
use crate::error::SnapshotError;
use crate::history::{AttemptRecord, HistoryLedger, PairHistory};
use crate::items::ItemStore;
use crate::quality::QualityEstimator;
use crate::types::{ItemId, PairKey, MIN_SCORE};

// ==================== Data Structures ====================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub name: ItemId,
    #[serde(flatten)]
    pub config: ItemConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairSnapshot {
    pub pair: PairKey,
    /// Cached best as last written; ignored on restore
    #[serde(default)]
    pub best: Option<u32>,
    #[serde(default)]
    pub records: Vec<AttemptRecord>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PracticeSnapshot {
    #[serde(default)]
    pub items: Vec<ItemSnapshot>,
    #[serde(default)]
    pub history: Vec<PairSnapshot>,
}

impl PracticeSnapshot {
    /// Capture the store and ledger as they are now
    pub fn capture(store: &ItemStore, ledger: &HistoryLedger) -> Self {
        let items = store
            .iter()
            .map(|item| ItemSnapshot {
                name: item.name.clone(),
                config: item.config(),
            })
            .collect();

        let history = ledger
            .iter()
            .map(|(pair, history)| PairSnapshot {
                pair: pair.clone(),
                best: Some(history.best()),
                records: history.records().to_vec(),
            })
            .collect();

        Self { items, history }
    }

    /// Rebuild a store and ledger, recomputing best scores and quality
    pub fn restore(self) -> Result<(ItemStore, HistoryLedger), SnapshotError> {
        let mut store = ItemStore::new();
        for item in self.items {
            store
                .insert(item.name.clone(), item.config)
                .map_err(|_| SnapshotError::DuplicateItem(item.name))?;
        }

        let mut ledger = HistoryLedger::new();
        let mut stored_bests = Vec::with_capacity(self.history.len());
        for entry in self.history {
            for name in [entry.pair.first(), entry.pair.second()] {
                if !store.contains(name) {
                    return Err(SnapshotError::UnknownItem(name.to_string()));
                }
            }

            let records = entry
                .records
                .into_iter()
                .map(|record| AttemptRecord {
                    score: record.score.max(MIN_SCORE),
                    timestamp: record.timestamp,
                })
                .collect();

            let history = PairHistory::from_parts(records, entry.best);
            if !ledger.insert_history(entry.pair.clone(), history) {
                return Err(SnapshotError::DuplicatePair(entry.pair.to_string()));
            }
            stored_bests.push((entry.pair, entry.best));
        }

        for (pair, stored) in &stored_bests {
            let rebuilt = ledger.rebuild_best(pair);
            if stored.is_some() && *stored != rebuilt {
                warn!(
                    pair = %pair,
                    stored = ?stored,
                    rebuilt = ?rebuilt,
                    "persisted best score was stale"
                );
            }
        }

        QualityEstimator::refresh(&mut store, &ledger);

        info!(
            items = store.len(),
            pairs = ledger.len(),
            "practice state restored"
        );

        Ok((store, ledger))
    }
}

// ==================== Tests ====================
