//! Persistent progression: coins, best score and owned cosmetics
//!
//! Every mutation writes through to storage immediately. Storage failures are
//! logged and play continues with the in-memory state.

pub mod catalog;
pub mod garage;

use serde::{Deserialize, Serialize};

pub use catalog::{CatalogEntry, CatalogKind, CosmeticProvider, NeonCatalog, Palette, Rgb, neon};
pub use garage::{GarageCursor, GarageOutcome, ItemStatus};

use crate::consts::ECONOMY_KEY;
use crate::persistence::{KeyValueStore, load_json, save_json};

/// Vehicle every player owns from the start
pub const DEFAULT_VEHICLE: &str = "sport";
/// Color theme every player owns from the start
pub const DEFAULT_COLOR: &str = "default";

/// Persisted progression
///
/// Field aliases accept saves written by the first web release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Economy {
    #[serde(alias = "coins")]
    pub balance: u64,
    #[serde(alias = "highScore")]
    pub best_score: u64,
    #[serde(alias = "ownedVehicles")]
    pub unlocked_vehicles: Vec<String>,
    #[serde(alias = "ownedColors")]
    pub unlocked_colors: Vec<String>,
    #[serde(alias = "currentVehicle")]
    pub selected_vehicle: String,
    #[serde(alias = "currentColor")]
    pub selected_color: String,
}

impl Default for Economy {
    fn default() -> Self {
        Self {
            balance: 0,
            best_score: 0,
            unlocked_vehicles: vec![DEFAULT_VEHICLE.to_string()],
            unlocked_colors: vec![DEFAULT_COLOR.to_string()],
            selected_vehicle: DEFAULT_VEHICLE.to_string(),
            selected_color: DEFAULT_COLOR.to_string(),
        }
    }
}

impl Economy {
    pub fn unlocked(&self, kind: CatalogKind) -> &[String] {
        match kind {
            CatalogKind::Vehicle => &self.unlocked_vehicles,
            CatalogKind::Color => &self.unlocked_colors,
        }
    }

    fn unlocked_mut(&mut self, kind: CatalogKind) -> &mut Vec<String> {
        match kind {
            CatalogKind::Vehicle => &mut self.unlocked_vehicles,
            CatalogKind::Color => &mut self.unlocked_colors,
        }
    }

    pub fn selected(&self, kind: CatalogKind) -> &str {
        match kind {
            CatalogKind::Vehicle => &self.selected_vehicle,
            CatalogKind::Color => &self.selected_color,
        }
    }

    fn selected_mut(&mut self, kind: CatalogKind) -> &mut String {
        match kind {
            CatalogKind::Vehicle => &mut self.selected_vehicle,
            CatalogKind::Color => &mut self.selected_color,
        }
    }

    pub fn is_unlocked(&self, kind: CatalogKind, id: &str) -> bool {
        self.unlocked(kind).iter().any(|owned| owned == id)
    }

    /// Repair data loaded from storage: starter items owned, no duplicates,
    /// and every selection pointing at something owned
    pub fn sanitize(&mut self) {
        for (kind, starter) in [
            (CatalogKind::Vehicle, DEFAULT_VEHICLE),
            (CatalogKind::Color, DEFAULT_COLOR),
        ] {
            let owned = self.unlocked_mut(kind);
            let mut seen = std::collections::HashSet::new();
            owned.retain(|id| seen.insert(id.clone()));
            if !owned.iter().any(|id| id == starter) {
                owned.insert(0, starter.to_string());
            }

            let selected = self.selected(kind).to_string();
            if !self.is_unlocked(kind, &selected) {
                log::warn!("Selected {:?} '{}' is not owned, resetting", kind, selected);
                *self.selected_mut(kind) = starter.to_string();
            }
        }
    }
}

/// Owns the economy and writes every change through to storage
#[derive(Debug)]
pub struct EconomyStore<S: KeyValueStore, C: CosmeticProvider> {
    store: S,
    catalog: C,
    data: Economy,
}

impl<S: KeyValueStore, C: CosmeticProvider> EconomyStore<S, C> {
    /// Load from storage, falling back to defaults on absent or corrupt data
    pub fn load(store: S, catalog: C) -> Self {
        let data = match load_json::<Economy>(&store, ECONOMY_KEY) {
            Ok(Some(mut data)) => {
                data.sanitize();
                log::info!(
                    "Loaded economy ({} coins, best {})",
                    data.balance,
                    data.best_score
                );
                data
            }
            Ok(None) => {
                log::info!("No saved economy found, starting fresh");
                Economy::default()
            }
            Err(e) => {
                log::warn!("Saved economy unreadable ({}), starting fresh", e);
                Economy::default()
            }
        };
        Self {
            store,
            catalog,
            data,
        }
    }

    pub fn economy(&self) -> &Economy {
        &self.data
    }

    pub fn balance(&self) -> u64 {
        self.data.balance
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Add coins
    pub fn credit(&mut self, amount: u64) {
        self.data.balance = self.data.balance.saturating_add(amount);
        self.persist();
    }

    /// Settle a finished run. Returns true when the score is a new best.
    pub fn record_run(&mut self, score: u64, coins_earned: u64) -> bool {
        let new_best = score > self.data.best_score;
        if new_best {
            self.data.best_score = score;
        }
        self.data.balance = self.data.balance.saturating_add(coins_earned);
        self.persist();
        log::info!(
            "Run settled: score {}, +{} coins{}",
            score,
            coins_earned,
            if new_best { " (new best)" } else { "" }
        );
        new_best
    }

    /// Buy an item. Fails without side effects when the item is unknown,
    /// already owned or unaffordable.
    pub fn purchase(&mut self, kind: CatalogKind, id: &str) -> bool {
        let Some(price) = self.catalog.entry(kind, id).map(|e| e.price) else {
            log::debug!("Purchase of unknown {:?} '{}'", kind, id);
            return false;
        };
        if self.data.is_unlocked(kind, id) || self.data.balance < price {
            return false;
        }

        self.data.balance -= price;
        self.data.unlocked_mut(kind).push(id.to_string());
        self.persist();
        log::info!("Bought {:?} '{}' for {}", kind, id, price);
        true
    }

    /// Select an owned item. Never buys.
    pub fn select(&mut self, kind: CatalogKind, id: &str) -> bool {
        if !self.data.is_unlocked(kind, id) {
            return false;
        }
        *self.data.selected_mut(kind) = id.to_string();
        self.persist();
        true
    }

    /// How the garage should present an item
    pub fn status(&self, kind: CatalogKind, id: &str) -> ItemStatus {
        if self.data.selected(kind) == id {
            ItemStatus::Selected
        } else if self.data.is_unlocked(kind, id) {
            ItemStatus::Owned
        } else {
            match self.catalog.entry(kind, id) {
                Some(entry) if entry.price <= self.data.balance => ItemStatus::Affordable,
                _ => ItemStatus::TooExpensive,
            }
        }
    }

    /// Palette of the selected color theme
    pub fn selected_palette(&self) -> Palette {
        self.catalog
            .entry(CatalogKind::Color, &self.data.selected_color)
            .and_then(|e| e.palette)
            .unwrap_or(Palette::Fixed {
                primary: catalog::neon::CYAN,
                secondary: catalog::neon::PINK,
            })
    }

    fn persist(&mut self) {
        if let Err(e) = save_json(&mut self.store, ECONOMY_KEY, &self.data) {
            log::warn!("Failed to save economy: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, StorageError};

    fn fresh() -> EconomyStore<MemoryStore, NeonCatalog> {
        EconomyStore::load(MemoryStore::new(), NeonCatalog::new())
    }

    fn with_balance(balance: u64) -> EconomyStore<MemoryStore, NeonCatalog> {
        let mut store = fresh();
        store.credit(balance);
        store
    }

    #[test]
    fn test_absent_data_gives_defaults() {
        let store = fresh();
        assert_eq!(store.economy(), &Economy::default());
        assert_eq!(store.economy().selected_vehicle, "sport");
        assert_eq!(store.economy().unlocked_colors, vec!["default".to_string()]);
    }

    #[test]
    fn test_serialized_shape() {
        let store = with_balance(3);
        let raw: serde_json::Value =
            serde_json::from_str(store.store().raw(ECONOMY_KEY).unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!({
                "balance": 3,
                "bestScore": 0,
                "unlockedVehicles": ["sport"],
                "unlockedColors": ["default"],
                "selectedVehicle": "sport",
                "selectedColor": "default"
            })
        );
    }

    #[test]
    fn test_corrupt_data_falls_back() {
        let mut kv = MemoryStore::new();
        kv.set(ECONOMY_KEY, "][").unwrap();
        let store = EconomyStore::load(kv, NeonCatalog::new());
        assert_eq!(store.economy(), &Economy::default());
    }

    #[test]
    fn test_legacy_save_loads() {
        let mut kv = MemoryStore::new();
        kv.set(
            ECONOMY_KEY,
            r#"{"coins":42,"ownedVehicles":["sport","suv"],"ownedColors":["default"],
                "currentVehicle":"suv","currentColor":"default","highScore":900}"#,
        )
        .unwrap();
        let store = EconomyStore::load(kv, NeonCatalog::new());
        assert_eq!(store.balance(), 42);
        assert_eq!(store.economy().best_score, 900);
        assert_eq!(store.economy().selected_vehicle, "suv");
    }

    #[test]
    fn test_sanitize_repairs_selection() {
        let mut kv = MemoryStore::new();
        kv.set(
            ECONOMY_KEY,
            r#"{"balance":5,"unlockedVehicles":["suv","suv"],"selectedVehicle":"future"}"#,
        )
        .unwrap();
        let store = EconomyStore::load(kv, NeonCatalog::new());
        let economy = store.economy();
        assert_eq!(economy.unlocked_vehicles, vec!["sport", "suv"]);
        assert_eq!(economy.selected_vehicle, "sport");
        assert_eq!(economy.selected_color, "default");
    }

    #[test]
    fn test_purchase_exact_balance_once() {
        let mut store = with_balance(300);
        assert!(store.purchase(CatalogKind::Vehicle, "suv"));
        assert_eq!(store.balance(), 0);
        assert!(store.economy().is_unlocked(CatalogKind::Vehicle, "suv"));

        store.credit(300);
        assert!(!store.purchase(CatalogKind::Vehicle, "suv"));
        assert_eq!(store.balance(), 300);
        assert_eq!(
            store
                .economy()
                .unlocked_vehicles
                .iter()
                .filter(|id| *id == "suv")
                .count(),
            1
        );
    }

    #[test]
    fn test_purchase_then_select() {
        // 600 + 500, exactly enough for both
        let mut store = with_balance(1100);
        for (kind, id) in [
            (CatalogKind::Vehicle, "future"),
            (CatalogKind::Color, "rainbow"),
        ] {
            assert!(store.purchase(kind, id));
            assert!(store.select(kind, id));
            assert_eq!(store.economy().selected(kind), id);
        }
        assert_eq!(store.selected_palette(), Palette::CyclingHue);
        assert_eq!(store.balance(), 0);
    }

    #[test]
    fn test_unaffordable_or_unknown_purchase() {
        let mut store = with_balance(99);
        assert!(!store.purchase(CatalogKind::Color, "ocean"));
        assert!(!store.purchase(CatalogKind::Color, "plaid"));
        // Ids do not leak across tables
        assert!(!store.purchase(CatalogKind::Vehicle, "ocean"));
        assert_eq!(store.balance(), 99);
        assert_eq!(store.economy().unlocked_colors, vec!["default".to_string()]);
    }

    #[test]
    fn test_select_never_buys() {
        let mut store = with_balance(1000);
        assert!(!store.select(CatalogKind::Vehicle, "moto"));
        assert_eq!(store.economy().selected_vehicle, "sport");
        assert_eq!(store.balance(), 1000);
    }

    #[test]
    fn test_every_mutation_persists() {
        let mut store = fresh();
        store.credit(500);
        store.purchase(CatalogKind::Color, "ocean");
        store.select(CatalogKind::Color, "ocean");
        store.record_run(1234, 123);
        assert_eq!(store.store().writes, 4);

        // A reload sees everything
        let kv = store.store().clone();
        let reloaded = EconomyStore::load(kv, NeonCatalog::new());
        assert_eq!(reloaded.balance(), 500 - 100 + 123);
        assert_eq!(reloaded.economy().best_score, 1234);
        assert_eq!(reloaded.economy().selected_color, "ocean");
    }

    #[test]
    fn test_record_run_best_score() {
        let mut store = fresh();
        assert!(store.record_run(500, 50));
        assert!(!store.record_run(400, 40));
        assert_eq!(store.economy().best_score, 500);
        assert_eq!(store.balance(), 90);
    }

    #[test]
    fn test_status() {
        let mut store = with_balance(150);
        store.purchase(CatalogKind::Color, "ocean");
        assert_eq!(
            store.status(CatalogKind::Color, "default"),
            ItemStatus::Selected
        );
        assert_eq!(store.status(CatalogKind::Color, "ocean"), ItemStatus::Owned);
        assert_eq!(
            store.status(CatalogKind::Color, "fire"),
            ItemStatus::TooExpensive
        );
        store.credit(200);
        assert_eq!(
            store.status(CatalogKind::Color, "fire"),
            ItemStatus::Affordable
        );
    }

    /// A store whose writes always fail
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Backend("quota exceeded".into()))
        }
    }

    #[test]
    fn test_storage_failures_are_not_fatal() {
        let mut store = EconomyStore::load(BrokenStore, NeonCatalog::new());
        store.credit(300);
        assert!(store.purchase(CatalogKind::Vehicle, "suv"));
        assert_eq!(store.balance(), 0);
    }
}
