//! Garage navigation
//!
//! A cursor over the two catalog tabs. The presentation layer maps taps and
//! keys onto these calls; the cursor itself never touches storage except
//! through [`EconomyStore`].

use super::EconomyStore;
use super::catalog::{CatalogEntry, CatalogKind, CosmeticProvider};
use crate::persistence::KeyValueStore;

/// How an item shows up on the garage button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    /// Owned and in use
    Selected,
    /// Owned, can be selected
    Owned,
    /// Not owned, enough coins
    Affordable,
    /// Not owned, not enough coins
    TooExpensive,
}

impl ItemStatus {
    pub fn label(&self, price: u64) -> String {
        match self {
            ItemStatus::Selected => "SELECTED".to_string(),
            ItemStatus::Owned => "SELECT".to_string(),
            ItemStatus::Affordable | ItemStatus::TooExpensive => format!("BUY ({})", price),
        }
    }
}

/// Result of pressing the garage action button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GarageOutcome {
    Selected,
    Purchased,
    /// Not affordable or nothing under the cursor
    Rejected,
}

/// Current tab and item in the garage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GarageCursor {
    pub tab: CatalogKind,
    pub index: usize,
}

impl Default for GarageCursor {
    fn default() -> Self {
        Self {
            tab: CatalogKind::Vehicle,
            index: 0,
        }
    }
}

impl GarageCursor {
    /// Step left (negative) or right (positive), wrapping around the tab
    pub fn step(&mut self, delta: i32, catalog: &impl CosmeticProvider) {
        let len = catalog.entries(self.tab).len();
        if len == 0 {
            self.index = 0;
            return;
        }
        let len = len as i64;
        let next = (self.index as i64 + delta as i64).rem_euclid(len);
        self.index = next as usize;
    }

    /// Switch to the other tab, back at its first item
    pub fn toggle_tab(&mut self) {
        self.set_tab(self.tab.other());
    }

    pub fn set_tab(&mut self, tab: CatalogKind) {
        self.tab = tab;
        self.index = 0;
    }

    /// Entry under the cursor
    pub fn current<'a>(&self, catalog: &'a impl CosmeticProvider) -> Option<&'a CatalogEntry> {
        catalog.entries(self.tab).get(self.index)
    }

    /// Select the item if owned, otherwise try to buy it
    pub fn activate<S, C>(&self, economy: &mut EconomyStore<S, C>) -> GarageOutcome
    where
        S: KeyValueStore,
        C: CosmeticProvider,
    {
        let Some(id) = self.current(economy.catalog()).map(|e| e.id.clone()) else {
            return GarageOutcome::Rejected;
        };
        if economy.economy().is_unlocked(self.tab, &id) {
            economy.select(self.tab, &id);
            GarageOutcome::Selected
        } else if economy.purchase(self.tab, &id) {
            GarageOutcome::Purchased
        } else {
            GarageOutcome::Rejected
        }
    }
}
