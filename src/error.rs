//! Error types for the item store, scheduler, snapshots and persistence.

use thiserror::Error;

/// Item registry and pair validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemError {
    #[error("duplicate item: {0}")]
    DuplicateItem(String),
    #[error("unknown item: {0}")]
    UnknownItem(String),
    #[error("item cannot be paired with itself: {0}")]
    SelfPair(String),
    #[error("no suggestion to record against")]
    NoSuggestion,
}

/// Reasons the scheduler cannot produce a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("no active items")]
    NoActiveItems,
    #[error("at least two items are needed to form a pair")]
    InsufficientItems,
}

/// A persisted snapshot that cannot be restored without breaking store invariants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("snapshot lists item twice: {0}")]
    DuplicateItem(String),
    #[error("snapshot history references unknown item: {0}")]
    UnknownItem(String),
    #[error("snapshot history lists pair twice: {0}")]
    DuplicatePair(String),
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Failures of facade operations that both validate items and schedule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error(transparent)]
    Item(#[from] ItemError),
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}
