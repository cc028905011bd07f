//! Countable resources held by the player.
//!
//! Counts are strictly positive: removing the last unit of a type deletes the
//! entry instead of storing zero, and a removal that would go negative is
//! rejected without touching the store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::state::error::InventoryError;

/// Resource-quantity map used by build requirements.
pub type Requirements = BTreeMap<String, u32>;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    items: BTreeMap<String, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, item: &str) -> u32 {
        self.items.get(item).copied().unwrap_or(0)
    }

    /// Adds `amount` units. Adding zero is a no-op.
    pub fn add(&mut self, item: &str, amount: u32) {
        if amount == 0 {
            return;
        }
        let count = self.items.entry(item.to_owned()).or_insert(0);
        *count = count.saturating_add(amount);
    }

    /// Removes `amount` units, deleting the entry when it reaches zero.
    pub fn remove(&mut self, item: &str, amount: u32) -> Result<u32, InventoryError> {
        let available = self.count(item);
        if available < amount {
            return Err(InventoryError::Insufficient {
                item: item.to_owned(),
                required: amount,
                available,
            });
        }

        let remaining = available - amount;
        if remaining == 0 {
            self.items.remove(item);
        } else {
            self.items.insert(item.to_owned(), remaining);
        }
        Ok(remaining)
    }

    pub fn has(&self, item: &str, amount: u32) -> bool {
        self.count(item) >= amount
    }

    pub fn has_all(&self, requirements: &Requirements) -> bool {
        requirements
            .iter()
            .all(|(item, amount)| self.has(item, *amount))
    }

    /// Checks every requirement before deducting any of them.
    pub fn consume_all(&mut self, requirements: &Requirements) -> Result<(), InventoryError> {
        if let Some((item, amount)) = requirements
            .iter()
            .find(|(item, amount)| !self.has(item, **amount))
        {
            return Err(InventoryError::Insufficient {
                item: item.clone(),
                required: *amount,
                available: self.count(item),
            });
        }

        for (item, amount) in requirements {
            self.remove(item, *amount)?;
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.items.iter().map(|(item, count)| (item.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn as_map(&self) -> &BTreeMap<String, u32> {
        &self.items
    }
}

impl FromIterator<(String, u32)> for Inventory {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        let mut inventory = Self::new();
        for (item, count) in iter {
            inventory.add(&item, count);
        }
        inventory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requirements(pairs: &[(&str, u32)]) -> Requirements {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn removing_last_unit_deletes_entry() {
        let mut inventory = Inventory::new();
        inventory.add("gem", 2);
        assert_eq!(inventory.remove("gem", 2), Ok(0));
        assert!(inventory.is_empty());
        assert_eq!(inventory.as_map().get("gem"), None);
    }

    #[test]
    fn over_removal_is_rejected_without_change() {
        let mut inventory = Inventory::new();
        inventory.add("wood", 1);
        let err = inventory.remove("wood", 3).unwrap_err();
        assert_eq!(
            err,
            InventoryError::Insufficient {
                item: "wood".into(),
                required: 3,
                available: 1
            }
        );
        assert_eq!(inventory.count("wood"), 1);
    }

    #[test]
    fn consume_all_is_atomic() {
        let mut inventory = Inventory::new();
        inventory.add("wood", 3);
        inventory.add("nails", 2);
        let before = inventory.clone();

        let result = inventory.consume_all(&requirements(&[("wood", 3), ("nails", 5)]));
        assert!(result.is_err());
        assert_eq!(inventory, before);
    }

    #[test]
    fn consume_all_deducts_everything_when_sufficient() {
        let mut inventory = Inventory::new();
        inventory.add("wood", 4);
        inventory.add("nails", 5);

        inventory
            .consume_all(&requirements(&[("wood", 3), ("nails", 5)]))
            .unwrap();
        assert_eq!(inventory.count("wood"), 1);
        assert!(!inventory.as_map().contains_key("nails"));
    }

    #[test]
    fn empty_requirements_are_always_met() {
        let inventory = Inventory::new();
        assert!(inventory.has_all(&Requirements::new()));
    }
}
