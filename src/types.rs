//! Shared key types and scoring constants.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ItemError;

// ==================== Constants ====================

/// Lowest score an attempt can store; also the best score of a pair with no records
pub const MIN_SCORE: u32 = 1;

/// Share each component item contributes to the weight of a never-attempted pair
pub const UNSEEN_COMPONENT_SHARE: f64 = 0.5;

/// Floor applied to an item's quality before it is inverted into a weight
pub const MIN_FALLBACK_QUALITY: f64 = 1.0;

/// Item identifier: a chord name or a song title
pub type ItemId = String;

/// Clamp a raw attempt score into the stored range `MIN_SCORE..=u32::MAX`
pub fn clamp_score(score: i64) -> u32 {
    score.clamp(MIN_SCORE as i64, u32::MAX as i64) as u32
}

// ==================== PairKey ====================

/// Unordered pair of two distinct items.
///
/// The two identifiers are stored sorted, so `(A, B)` and `(B, A)` produce the
/// same key. Serializes as a two-field record `{ "a": .., "b": .. }`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawPair", into = "RawPair")]
pub struct PairKey {
    a: ItemId,
    b: ItemId,
}

impl PairKey {
    /// Build the canonical key for two items; fails when both names are the same
    pub fn new(first: impl Into<ItemId>, second: impl Into<ItemId>) -> Result<Self, ItemError> {
        let first = first.into();
        let second = second.into();

        if first == second {
            return Err(ItemError::SelfPair(first));
        }

        if first < second {
            Ok(Self { a: first, b: second })
        } else {
            Ok(Self { a: second, b: first })
        }
    }

    /// Lexicographically smaller member
    pub fn first(&self) -> &str {
        &self.a
    }

    /// Lexicographically larger member
    pub fn second(&self) -> &str {
        &self.b
    }

    pub fn contains(&self, name: &str) -> bool {
        self.a == name || self.b == name
    }

    /// Both members, smaller first
    pub fn as_tuple(&self) -> (&str, &str) {
        (&self.a, &self.b)
    }

    pub fn into_tuple(self) -> (ItemId, ItemId) {
        (self.a, self.b)
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.a, self.b)
    }
}

/// Persisted shape of a pair key; may arrive unsorted
#[derive(Clone, Debug, Serialize, Deserialize)]
struct RawPair {
    a: ItemId,
    b: ItemId,
}

impl TryFrom<RawPair> for PairKey {
    type Error = ItemError;

    fn try_from(raw: RawPair) -> Result<Self, Self::Error> {
        PairKey::new(raw.a, raw.b)
    }
}

impl From<PairKey> for RawPair {
    fn from(key: PairKey) -> Self {
        RawPair { a: key.a, b: key.b }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_is_order_independent() {
        let ab = PairKey::new("A", "B").unwrap();
        let ba = PairKey::new("B", "A").unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab.as_tuple(), ("A", "B"));
    }

    #[test]
    fn test_pair_key_rejects_self_pair() {
        let err = PairKey::new("Em", "Em").unwrap_err();
        assert_eq!(err, ItemError::SelfPair("Em".to_string()));
    }

    #[test]
    fn test_pair_key_case_sensitive() {
        let key = PairKey::new("a", "A").unwrap();
        assert_eq!(key.first(), "A");
        assert_eq!(key.second(), "a");
    }

    #[test]
    fn test_pair_key_serializes_as_record() {
        let key = PairKey::new("G", "C").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, r#"{"a":"C","b":"G"}"#);
    }

    #[test]
    fn test_pair_key_deserialize_canonicalizes_and_validates() {
        let key: PairKey = serde_json::from_str(r#"{"a":"G","b":"C"}"#).unwrap();
        assert_eq!(key.as_tuple(), ("C", "G"));

        let bad = serde_json::from_str::<PairKey>(r#"{"a":"G","b":"G"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(-5), 1);
        assert_eq!(clamp_score(0), 1);
        assert_eq!(clamp_score(42), 42);
        assert_eq!(clamp_score(i64::MAX), u32::MAX);
    }
}
