//! Age-weighted rotation over single items
//!
//! Used for songs kept in the repertoire: each active item carries an age
//! (suggestions since it was last picked, starting at 1). An item is drawn
//! with probability proportional to its age; afterwards the chosen item's
//! age resets to 1 and every other active item ages by one.

use rand::Rng;

use crate::error::SchedulerError;
use crate::items::ItemStore;
use crate::types::ItemId;

/// Draw one active item weighted by age, without touching the store
pub fn pick_by_age<R: Rng>(store: &ItemStore, rng: &mut R) -> Result<ItemId, SchedulerError> {
    let active: Vec<(&str, u64)> = store
        .iter()
        .filter(|item| item.active)
        .map(|item| (item.name.as_str(), u64::from(item.age.max(1))))
        .collect();

    if active.is_empty() {
        return Err(SchedulerError::NoActiveItems);
    }

    let total: u64 = active.iter().map(|(_, age)| age).sum();
    let mut remaining = rng.gen_range(0..total);

    for (name, age) in &active {
        if remaining < *age {
            return Ok(name.to_string());
        }
        remaining -= age;
    }

    // Unreachable while `remaining < total`
    Err(SchedulerError::NoActiveItems)
}

/// Reset `chosen` to age 1 and age every other active item by one
pub fn advance_ages(store: &mut ItemStore, chosen: &str) {
    for item in store.items_mut().filter(|item| item.active) {
        if item.name == chosen {
            item.age = 1;
        } else {
            item.age = item.age.saturating_add(1);
        }
    }
}

/// Pick an active item by age and advance the rotation
pub fn suggest_by_age<R: Rng>(store: &mut ItemStore, rng: &mut R) -> Result<ItemId, SchedulerError> {
    let chosen = pick_by_age(store, rng)?;
    advance_ages(store, &chosen);
    Ok(chosen)
}
