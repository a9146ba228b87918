//! Scheduler options and per-item configuration defaults.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a pair that has never been attempted is weighted
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnseenPairPolicy {
    /// `0.5 / max(q_x, 1) + 0.5 / max(q_y, 1)` from the component items' quality
    #[default]
    QualityFallback,
    /// Every unseen pair counts as a best score of 1
    UnitWeight,
}

impl FromStr for UnseenPairPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quality" | "quality_fallback" => Ok(UnseenPairPolicy::QualityFallback),
            "unit" | "unit_weight" => Ok(UnseenPairPolicy::UnitWeight),
            other => Err(format!("unknown unseen pair policy: {other}")),
        }
    }
}

/// Options for a practice domain
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SchedulerOptions {
    /// Random seed for reproducible suggestions (system time when absent)
    pub seed: Option<u64>,
    /// Weighting of never-attempted pairs (default: quality fallback)
    pub unseen_pair_policy: Option<UnseenPairPolicy>,
}

impl SchedulerOptions {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Read `PRACTICE_SEED` and `PRACTICE_UNSEEN_PAIR_POLICY`; unparsable values are ignored
    pub fn from_env() -> Self {
        let seed = std::env::var("PRACTICE_SEED")
            .ok()
            .and_then(|value| value.parse::<u64>().ok());

        let unseen_pair_policy = std::env::var("PRACTICE_UNSEEN_PAIR_POLICY")
            .ok()
            .and_then(|value| value.parse::<UnseenPairPolicy>().ok());

        Self {
            seed,
            unseen_pair_policy,
        }
    }

    pub fn policy(&self) -> UnseenPairPolicy {
        self.unseen_pair_policy.unwrap_or_default()
    }
}

fn default_active() -> bool {
    true
}

fn default_age() -> u32 {
    1
}

/// Recognized per-item keys and their defaults.
///
/// This is the persisted item record minus the name; fields missing from a
/// stored record fall back to these defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemConfig {
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub quality: f64,
    #[serde(default)]
    pub pairs_seen: u32,
    /// Rotation age: suggestions since this item was last picked, starting at 1
    #[serde(default = "default_age")]
    pub age: u32,
}

impl Default for ItemConfig {
    fn default() -> Self {
        Self {
            active: default_active(),
            required: false,
            quality: 0.0,
            pairs_seen: 0,
            age: default_age(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_config_defaults() {
        let config = ItemConfig::default();
        assert!(config.active);
        assert!(!config.required);
        assert_eq!(config.quality, 0.0);
        assert_eq!(config.pairs_seen, 0);
        assert_eq!(config.age, 1);
    }

    #[test]
    fn test_item_config_missing_fields_take_defaults() {
        let config: ItemConfig = serde_json::from_str(r#"{"required": true}"#).unwrap();
        assert!(config.active);
        assert!(config.required);
        assert_eq!(config.age, 1);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("unit".parse::<UnseenPairPolicy>(), Ok(UnseenPairPolicy::UnitWeight));
        assert_eq!(
            " Quality ".parse::<UnseenPairPolicy>(),
            Ok(UnseenPairPolicy::QualityFallback)
        );
        assert!("harmonic".parse::<UnseenPairPolicy>().is_err());
    }

    #[test]
    fn test_options_from_env() {
        std::env::set_var("PRACTICE_UNSEEN_PAIR_POLICY", "unit");
        std::env::set_var("PRACTICE_SEED", "not-a-number");
        let options = SchedulerOptions::from_env();
        assert_eq!(options.seed, None);
        assert_eq!(options.policy(), UnseenPairPolicy::UnitWeight);

        std::env::set_var("PRACTICE_UNSEEN_PAIR_POLICY", "harmonic");
        std::env::set_var("PRACTICE_SEED", "17");
        let options = SchedulerOptions::from_env();
        assert_eq!(options.seed, Some(17));
        assert_eq!(options.unseen_pair_policy, None);
        assert_eq!(options.policy(), UnseenPairPolicy::QualityFallback);

        std::env::remove_var("PRACTICE_UNSEEN_PAIR_POLICY");
        std::env::remove_var("PRACTICE_SEED");
    }

    #[test]
    fn test_options_default_policy() {
        let options = SchedulerOptions::with_seed(7);
        assert_eq!(options.seed, Some(7));
        assert_eq!(options.policy(), UnseenPairPolicy::QualityFallback);
    }
}
