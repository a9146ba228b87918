//! Practice domain facade
//!
//! One `PracticeDomain` owns the item store, history ledger and random
//! source for a single practice area (chord changes, songs). The UI shell
//! constructs one per area and calls into it; nothing here is global.
//!
//! All operations are synchronous and expect one caller at a time. A
//! multi-threaded host should guard the whole domain with one mutex, since
//! suggestions read the store and the ledger together.

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::Path;
use tracing::debug;

use crate::config::{SchedulerOptions, UnseenPairPolicy};
use crate::error::{DomainError, ItemError, PersistenceError, SchedulerError, SnapshotError};
use crate::history::{BestTable, HistoryLedger};
use crate::items::ItemStore;
use crate::persistence;
use crate::quality::{QualityEstimator, QualityTable};
use crate::rotation;
use crate::scheduler::{Scheduler, Suggestion, WeightedPairs};
use crate::snapshot::PracticeSnapshot;
use crate::types::{ItemId, PairKey};

pub struct PracticeDomain {
    store: ItemStore,
    ledger: HistoryLedger,
    rng: ChaCha8Rng,
    policy: UnseenPairPolicy,
    last_suggestion: Option<PairKey>,
}

impl Default for PracticeDomain {
    fn default() -> Self {
        Self::new()
    }
}

impl PracticeDomain {
    pub fn new() -> Self {
        Self::with_options(SchedulerOptions::default())
    }

    pub fn with_options(options: SchedulerOptions) -> Self {
        Self::from_parts(ItemStore::new(), HistoryLedger::new(), options)
    }

    /// Restore a domain from a persisted snapshot
    pub fn from_snapshot(
        snapshot: PracticeSnapshot,
        options: SchedulerOptions,
    ) -> Result<Self, SnapshotError> {
        let (store, ledger) = snapshot.restore()?;
        Ok(Self::from_parts(store, ledger, options))
    }

    /// Load a domain from a JSON file; a missing file gives an empty domain
    pub fn load(path: &Path, options: SchedulerOptions) -> Result<Self, PersistenceError> {
        let snapshot = persistence::load_snapshot_or_default(path)?;
        Ok(Self::from_snapshot(snapshot, options)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        persistence::save_snapshot(path, &self.snapshot_state())
    }

    fn from_parts(store: ItemStore, ledger: HistoryLedger, options: SchedulerOptions) -> Self {
        let seed = options.seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(42)
        });

        Self {
            store,
            ledger,
            rng: ChaCha8Rng::seed_from_u64(seed),
            policy: options.policy(),
            last_suggestion: None,
        }
    }

    // ==================== Items ====================

    pub fn add_item(&mut self, name: impl Into<ItemId>) -> Result<(), ItemError> {
        self.store.add_item(name)
    }

    pub fn add_item_with_flags(
        &mut self,
        name: impl Into<ItemId>,
        active: bool,
        required: bool,
    ) -> Result<(), ItemError> {
        self.store.add_item_with_flags(name, active, required)
    }

    pub fn set_active(&mut self, name: &str, active: bool) -> Result<(), ItemError> {
        self.store.set_active(name, active)
    }

    pub fn set_required(&mut self, name: &str, required: bool) -> Result<(), ItemError> {
        self.store.set_required(name, required)
    }

    // ==================== Attempts ====================

    /// Record a score for the pair `(item_a, item_b)`; returns the stored (clamped) score
    pub fn record_attempt(&mut self, item_a: &str, item_b: &str, score: i64) -> Result<u32, ItemError> {
        self.record_attempt_at(item_a, item_b, score, Utc::now())
    }

    pub fn record_attempt_at(
        &mut self,
        item_a: &str,
        item_b: &str,
        score: i64,
        timestamp: DateTime<Utc>,
    ) -> Result<u32, ItemError> {
        self.store.ensure_known(&[item_a, item_b])?;
        let pair = PairKey::new(item_a, item_b)?;
        Ok(self.record_pair(pair, score, timestamp))
    }

    /// Record a score against the most recent suggestion and clear it
    pub fn record_last_suggestion(&mut self, score: i64) -> Result<u32, ItemError> {
        let pair = self.last_suggestion.take().ok_or(ItemError::NoSuggestion)?;
        self.store.ensure_known(&[pair.first(), pair.second()])?;
        Ok(self.record_pair(pair, score, Utc::now()))
    }

    fn record_pair(&mut self, pair: PairKey, score: i64, timestamp: DateTime<Utc>) -> u32 {
        let stored = self.ledger.record_at(pair.clone(), score, timestamp);
        QualityEstimator::refresh(&mut self.store, &self.ledger);

        debug!(
            item_a = pair.first(),
            item_b = pair.second(),
            score = stored,
            best = ?self.ledger.best_for(&pair),
            "attempt recorded"
        );
        stored
    }

    // ==================== Suggestions ====================

    /// Next pair to practice, under the required-item policy
    pub fn suggest_next(&mut self) -> Result<(ItemId, ItemId), SchedulerError> {
        self.suggest_with_best()
            .map(|suggestion| suggestion.pair.into_tuple())
    }

    /// Next pair plus its current best score and draw probability
    pub fn suggest_with_best(&mut self) -> Result<Suggestion, SchedulerError> {
        let suggestion = Scheduler::with_policy(&self.store, &self.ledger, self.policy)
            .suggest(&mut self.rng)?;
        Ok(self.remember(suggestion))
    }

    /// Next pair among those touching any of `anchors`
    pub fn suggest_anchored(&mut self, anchors: &[&str]) -> Result<Suggestion, DomainError> {
        self.store.ensure_known(anchors)?;
        let suggestion = Scheduler::with_policy(&self.store, &self.ledger, self.policy)
            .suggest_for(anchors, &mut self.rng)?;
        Ok(self.remember(suggestion))
    }

    /// Next single item from the age-weighted rotation
    pub fn suggest_rotation(&mut self) -> Result<ItemId, SchedulerError> {
        let chosen = rotation::suggest_by_age(&mut self.store, &mut self.rng)?;
        debug!(item = %chosen, "rotation suggested");
        Ok(chosen)
    }

    fn remember(&mut self, suggestion: Suggestion) -> Suggestion {
        debug!(
            item_a = suggestion.pair.first(),
            item_b = suggestion.pair.second(),
            best = ?suggestion.best,
            probability = suggestion.probability,
            "pair suggested"
        );
        self.last_suggestion = Some(suggestion.pair.clone());
        suggestion
    }

    // ==================== Views ====================

    pub fn known_pairs(&self) -> Result<Vec<PairKey>, SchedulerError> {
        Scheduler::with_policy(&self.store, &self.ledger, self.policy).known_pairs()
    }

    pub fn weighted_pairs(&self) -> Result<WeightedPairs, SchedulerError> {
        Scheduler::with_policy(&self.store, &self.ledger, self.policy).weighted_pairs()
    }

    pub fn quality_table(&self) -> QualityTable {
        QualityEstimator::estimate(&self.store, &self.ledger)
    }

    /// Best scores over every item, in insertion order
    pub fn best_table(&self) -> BestTable {
        let names: Vec<&str> = self.store.iter().map(|item| item.name.as_str()).collect();
        self.ledger.best_table(&names)
    }

    pub fn snapshot_state(&self) -> PracticeSnapshot {
        PracticeSnapshot::capture(&self.store, &self.ledger)
    }

    pub fn last_suggestion(&self) -> Option<&PairKey> {
        self.last_suggestion.as_ref()
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    pub fn ledger(&self) -> &HistoryLedger {
        &self.ledger
    }

    pub fn policy(&self) -> UnseenPairPolicy {
        self.policy
    }
}

// ==================== Tests ====================
