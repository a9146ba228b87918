//! # practice-scheduler - adaptive practice scheduling
//!
//! Decides which pair of practice items (chord changes, songs) to work on
//! next, from the history of past attempt scores:
//!
//! - **Items** - registry of practice items with `active`/`required` flags
//! - **History** - append-only attempt ledger with per-pair best scores
//! - **Quality** - harmonic-mean competence estimate per item
//! - **Scheduler** - weighted-random pair selection, worse pairs more likely
//! - **Rotation** - age-weighted single-item rotation for songs
//!
//! ## Usage
//!
//! ```rust
//! use practice_scheduler::{PracticeDomain, SchedulerOptions};
//!
//! let mut chords = PracticeDomain::with_options(SchedulerOptions::with_seed(7));
//! chords.add_item("C").unwrap();
//! chords.add_item("G").unwrap();
//!
//! let (a, b) = chords.suggest_next().unwrap();
//! chords.record_attempt(&a, &b, 42).unwrap();
//! ```

#![deny(clippy::all)]

pub mod config;
pub mod domain;
pub mod error;
pub mod history;
pub mod items;
pub mod persistence;
pub mod quality;
pub mod rotation;
pub mod scheduler;
pub mod snapshot;
pub mod types;

pub use config::{ItemConfig, SchedulerOptions, UnseenPairPolicy};
pub use domain::PracticeDomain;
pub use error::{DomainError, ItemError, PersistenceError, SchedulerError, SnapshotError};
pub use history::{AttemptRecord, BestTable, HistoryLedger, PairHistory};
pub use items::{Item, ItemStore};
pub use quality::{compute_quality, ItemQuality, QualityEstimator, QualityTable};
pub use scheduler::{anchored_pairs, unseen_pair_weight, Scheduler, Suggestion, WeightedPairs};
pub use snapshot::{ItemSnapshot, PairSnapshot, PracticeSnapshot};
pub use types::*;
