//! Weighted-random pair scheduler
//!
//! Picks the next pair to practice with probability inversely proportional
//! to competence:
//! - Attempted pair with best score `B` -> weight `1/B`
//! - Never-attempted pair `(x, y)` -> `0.5/max(q_x, 1) + 0.5/max(q_y, 1)`
//!   from the estimated item quality (or `1` under the unit-weight policy)
//!
//! Candidate pairs touch at least one required active item, or span all
//! active items when none is required. Weights are snapshotted once and the
//! same snapshot is used to sum and to walk, so the draw can never see two
//! different weight sets.

use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::UnseenPairPolicy;
use crate::error::SchedulerError;
use crate::history::HistoryLedger;
use crate::items::ItemStore;
use crate::quality::{QualityEstimator, QualityTable};
use crate::types::{PairKey, MIN_FALLBACK_QUALITY, UNSEEN_COMPONENT_SHARE};

// ==================== Data Structures ====================

/// Selected pair and its current best score (`None` if never attempted)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub pair: PairKey,
    pub best: Option<u32>,
    /// Probability the pair had of being drawn
    pub probability: f64,
}

impl Suggestion {
    /// Best score, counting a never-attempted pair as 1
    pub fn best_or_default(&self) -> u32 {
        self.best.unwrap_or(crate::types::MIN_SCORE)
    }
}

/// Candidate pairs with one frozen weight each, in candidate order
#[derive(Clone, Debug, PartialEq)]
pub struct WeightedPairs {
    pairs: Vec<PairKey>,
    weights: Vec<f64>,
    total: f64,
}

impl WeightedPairs {
    fn new(pairs: Vec<PairKey>, weights: Vec<f64>) -> Self {
        let total = weights.iter().sum();
        Self {
            pairs,
            weights,
            total,
        }
    }

    pub fn pairs(&self) -> &[PairKey] {
        &self.pairs
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn weight_of(&self, pair: &PairKey) -> Option<f64> {
        self.pairs
            .iter()
            .position(|candidate| candidate == pair)
            .map(|idx| self.weights[idx])
    }

    pub fn probability_of(&self, pair: &PairKey) -> Option<f64> {
        if self.total <= 0.0 {
            return None;
        }
        self.weight_of(pair).map(|weight| weight / self.total)
    }

    /// Index of the first pair whose cumulative weight exceeds `target`.
    ///
    /// `target` is expected in `[0, total)`; rounding at the top end falls
    /// back to the last pair.
    pub fn index_at(&self, target: f64) -> Option<usize> {
        if self.pairs.is_empty() {
            return None;
        }

        let mut cumulative = 0.0;
        for (idx, weight) in self.weights.iter().enumerate() {
            cumulative += weight;
            if cumulative > target {
                return Some(idx);
            }
        }

        Some(self.pairs.len() - 1)
    }

    /// Draw `u` uniformly from `[0, total)` and walk the cumulative weights
    pub fn draw<R: Rng>(&self, rng: &mut R) -> Option<usize> {
        let u = rng.gen::<f64>() * self.total;
        self.index_at(u)
    }
}

// ==================== Core Functions ====================

/// Deduplicated unordered pairs touching at least one anchor.
///
/// Each anchor, in order, is removed from the pool before it is paired with
/// what remains, so a pair is emitted once and never against itself.
/// Repeated anchors are processed once.
pub fn anchored_pairs(anchors: &[&str], pool: &[&str]) -> Vec<PairKey> {
    let mut remaining: Vec<&str> = pool.to_vec();
    let mut processed: HashSet<&str> = HashSet::with_capacity(anchors.len());
    let mut pairs = Vec::new();

    for &anchor in anchors {
        if !processed.insert(anchor) {
            continue;
        }
        remaining.retain(|&name| name != anchor);
        pairs.extend(
            remaining
                .iter()
                .filter_map(|&other| PairKey::new(anchor, other).ok()),
        );
    }

    pairs
}

/// Weight of a never-attempted pair from its members' quality
pub fn unseen_pair_weight(quality_x: f64, quality_y: f64) -> f64 {
    UNSEEN_COMPONENT_SHARE / quality_x.max(MIN_FALLBACK_QUALITY)
        + UNSEEN_COMPONENT_SHARE / quality_y.max(MIN_FALLBACK_QUALITY)
}

// ==================== Scheduler ====================

/// Stateless view over a store and ledger that computes selections
pub struct Scheduler<'a> {
    store: &'a ItemStore,
    ledger: &'a HistoryLedger,
    policy: UnseenPairPolicy,
}

impl<'a> Scheduler<'a> {
    pub fn new(store: &'a ItemStore, ledger: &'a HistoryLedger) -> Self {
        Self::with_policy(store, ledger, UnseenPairPolicy::default())
    }

    pub fn with_policy(
        store: &'a ItemStore,
        ledger: &'a HistoryLedger,
        policy: UnseenPairPolicy,
    ) -> Self {
        Self {
            store,
            ledger,
            policy,
        }
    }

    /// Candidate pairs under the required-item policy.
    ///
    /// Required items that are inactive are ignored; when no active item is
    /// required every active item is an anchor.
    pub fn known_pairs(&self) -> Result<Vec<PairKey>, SchedulerError> {
        let active = self.active_checked()?;

        let required: Vec<&str> = self
            .store
            .required_items()
            .into_iter()
            .filter(|name| active.contains(name))
            .collect();
        let anchors = if required.is_empty() {
            &active
        } else {
            &required
        };

        Self::non_empty(anchored_pairs(anchors, &active))
    }

    /// Candidate pairs touching any of `anchors`; anchors that are not active
    /// are ignored
    pub fn pairs_for(&self, anchors: &[&str]) -> Result<Vec<PairKey>, SchedulerError> {
        let active = self.active_checked()?;

        let anchors: Vec<&str> = anchors
            .iter()
            .copied()
            .filter(|name| active.contains(name))
            .collect();

        Self::non_empty(anchored_pairs(&anchors, &active))
    }

    /// Freeze one weight per candidate, in candidate order
    pub fn weigh(&self, pairs: Vec<PairKey>) -> WeightedPairs {
        let quality = match self.policy {
            UnseenPairPolicy::QualityFallback => QualityEstimator::estimate(self.store, self.ledger),
            UnseenPairPolicy::UnitWeight => QualityTable::default(),
        };

        let weights = pairs
            .par_iter()
            .map(|pair| self.pair_weight(pair, &quality))
            .collect();

        WeightedPairs::new(pairs, weights)
    }

    pub fn weighted_pairs(&self) -> Result<WeightedPairs, SchedulerError> {
        Ok(self.weigh(self.known_pairs()?))
    }

    /// Draw the next pair under the required-item policy
    pub fn suggest<R: Rng>(&self, rng: &mut R) -> Result<Suggestion, SchedulerError> {
        let weighted = self.weighted_pairs()?;
        self.pick(&weighted, rng)
    }

    /// Draw the next pair among those touching any of `anchors`
    pub fn suggest_for<R: Rng>(
        &self,
        anchors: &[&str],
        rng: &mut R,
    ) -> Result<Suggestion, SchedulerError> {
        let weighted = self.weigh(self.pairs_for(anchors)?);
        self.pick(&weighted, rng)
    }

    fn pick<R: Rng>(
        &self,
        weighted: &WeightedPairs,
        rng: &mut R,
    ) -> Result<Suggestion, SchedulerError> {
        let idx = weighted
            .draw(rng)
            .ok_or(SchedulerError::InsufficientItems)?;
        let pair = weighted.pairs[idx].clone();

        Ok(Suggestion {
            best: self.ledger.best_for(&pair),
            probability: weighted.weights[idx] / weighted.total,
            pair,
        })
    }

    fn pair_weight(&self, pair: &PairKey, quality: &QualityTable) -> f64 {
        match self.ledger.best_for(pair) {
            Some(best) => 1.0 / best as f64,
            None => match self.policy {
                UnseenPairPolicy::QualityFallback => {
                    unseen_pair_weight(quality.quality(pair.first()), quality.quality(pair.second()))
                }
                UnseenPairPolicy::UnitWeight => 1.0,
            },
        }
    }

    fn active_checked(&self) -> Result<Vec<&'a str>, SchedulerError> {
        let active = self.store.active_items();
        if active.is_empty() {
            return Err(SchedulerError::NoActiveItems);
        }
        if self.store.len() < 2 {
            return Err(SchedulerError::InsufficientItems);
        }
        Ok(active)
    }

    fn non_empty(pairs: Vec<PairKey>) -> Result<Vec<PairKey>, SchedulerError> {
        if pairs.is_empty() {
            Err(SchedulerError::InsufficientItems)
        } else {
            Ok(pairs)
        }
    }
}

// ==================== Tests ====================
