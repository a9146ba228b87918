//! Item registry
//!
//! Holds the universe of practice items (chords or songs) in insertion order,
//! each with its `active`/`required` flags and the last computed quality.
//! Items are never removed implicitly.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::ItemConfig;
use crate::error::ItemError;
use crate::types::ItemId;

// ==================== Data Structures ====================

/// A practice item and its stored attributes
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: ItemId,
    /// Eligible for selection at all
    pub active: bool,
    /// Must appear in every candidate pair while any active item is required
    pub required: bool,
    /// Last computed quality (0 when never attempted)
    pub quality: f64,
    /// Number of attempted pairs this item belongs to
    pub pairs_seen: u32,
    /// Rotation age used by single-item suggestion
    pub age: u32,
}

impl Item {
    pub fn new(name: impl Into<ItemId>, config: ItemConfig) -> Self {
        Self {
            name: name.into(),
            active: config.active,
            required: config.required,
            quality: config.quality.max(0.0),
            pairs_seen: config.pairs_seen,
            age: config.age.max(1),
        }
    }

    pub fn config(&self) -> ItemConfig {
        ItemConfig {
            active: self.active,
            required: self.required,
            quality: self.quality,
            pairs_seen: self.pairs_seen,
            age: self.age,
        }
    }
}

/// Insertion-ordered item registry with exact, case-sensitive name lookup
#[derive(Clone, Debug, Default)]
pub struct ItemStore {
    items: Vec<Item>,
    index: HashMap<ItemId, usize>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an active, non-required item
    pub fn add_item(&mut self, name: impl Into<ItemId>) -> Result<(), ItemError> {
        self.insert(name, ItemConfig::default())
    }

    pub fn add_item_with_flags(
        &mut self,
        name: impl Into<ItemId>,
        active: bool,
        required: bool,
    ) -> Result<(), ItemError> {
        self.insert(
            name,
            ItemConfig {
                active,
                required,
                ..ItemConfig::default()
            },
        )
    }

    /// Add an item with every stored attribute given explicitly
    pub fn insert(&mut self, name: impl Into<ItemId>, config: ItemConfig) -> Result<(), ItemError> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(ItemError::DuplicateItem(name));
        }

        self.index.insert(name.clone(), self.items.len());
        self.items.push(Item::new(name, config));
        Ok(())
    }

    /// Update either flag; `None` leaves that flag unchanged
    pub fn set_flags(
        &mut self,
        name: &str,
        active: Option<bool>,
        required: Option<bool>,
    ) -> Result<(), ItemError> {
        let item = self.get_mut(name)?;
        if let Some(active) = active {
            item.active = active;
        }
        if let Some(required) = required {
            item.required = required;
        }
        Ok(())
    }

    pub fn set_active(&mut self, name: &str, active: bool) -> Result<(), ItemError> {
        self.set_flags(name, Some(active), None)
    }

    pub fn set_required(&mut self, name: &str, required: bool) -> Result<(), ItemError> {
        self.set_flags(name, None, Some(required))
    }

    /// Names of active items, in insertion order
    pub fn active_items(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|item| item.active)
            .map(|item| item.name.as_str())
            .collect()
    }

    /// Names of required items, in insertion order
    pub fn required_items(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|item| item.required)
            .map(|item| item.name.as_str())
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&Item> {
        self.index.get(name).map(|&idx| &self.items[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Fail with `UnknownItem` for the first name not in the store
    pub fn ensure_known(&self, names: &[&str]) -> Result<(), ItemError> {
        match names.iter().find(|name| !self.contains(name)) {
            Some(missing) => Err(ItemError::UnknownItem(missing.to_string())),
            None => Ok(()),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Overwrite computed quality fields; names not in the store are skipped
    pub(crate) fn set_quality(&mut self, name: &str, quality: f64, pairs_seen: u32) {
        if let Some(&idx) = self.index.get(name) {
            let item = &mut self.items[idx];
            item.quality = quality;
            item.pairs_seen = pairs_seen;
        }
    }

    pub(crate) fn items_mut(&mut self) -> impl Iterator<Item = &mut Item> {
        self.items.iter_mut()
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Item, ItemError> {
        match self.index.get(name) {
            Some(&idx) => Ok(&mut self.items[idx]),
            None => Err(ItemError::UnknownItem(name.to_string())),
        }
    }
}

// ==================== Tests ====================
