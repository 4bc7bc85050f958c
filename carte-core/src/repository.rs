//! Menu data repository.
//!
//! Owns the in-memory [`Catalog`] and is the only path through which it is
//! mutated. Loading walks a fallback chain and never fails:
//!
//! 1. the admin-edited catalog stored under `menuDataCustom`
//! 2. the seed document (bundled at build time unless overridden)
//! 3. an empty catalog

use std::fmt;

use crate::models::{Catalog, Dish};
use crate::store::{persist, KeyValueStore, SharedStore, StoreKey};

/// Seed menu compiled into the binary.
pub const BUNDLED_SEED: &str = include_str!("../data/menu.json");

/// Which tier of the fallback chain produced the current catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    Custom,
    Seed,
    Empty,
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::Custom => write!(f, "custom"),
            CatalogSource::Seed => write!(f, "seed"),
            CatalogSource::Empty => write!(f, "empty"),
        }
    }
}

pub struct MenuRepository {
    store: SharedStore,
    seed: String,
    catalog: Catalog,
    source: CatalogSource,
}

impl MenuRepository {
    /// Loads the catalog, falling back from the store to `seed` to empty.
    pub fn load(store: SharedStore, seed: impl Into<String>) -> Self {
        let seed = seed.into();
        let (catalog, source) = match load_custom(store.as_ref()) {
            Some(catalog) => (catalog, CatalogSource::Custom),
            None => load_seed(&seed),
        };
        tracing::debug!(
            "Loaded catalog from {} ({} dishes)",
            source,
            catalog.dishes.len()
        );

        Self {
            store,
            seed,
            catalog,
            source,
        }
    }

    /// Loads the catalog with the seed compiled into the binary.
    pub fn with_bundled_seed(store: SharedStore) -> Self {
        Self::load(store, BUNDLED_SEED)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn source(&self) -> CatalogSource {
        self.source
    }

    /// Writes the catalog under `menuDataCustom`. Returns true on success;
    /// failures are logged and the in-memory catalog is kept.
    pub fn save(&self) -> bool {
        persist(self.store.as_ref(), StoreKey::MenuDataCustom, &self.catalog)
    }

    /// Applies a mutation to the catalog and persists the result.
    pub fn update<R>(&mut self, mutate: impl FnOnce(&mut Catalog) -> R) -> R {
        let result = mutate(&mut self.catalog);
        self.source = CatalogSource::Custom;
        self.save();
        result
    }

    /// Swaps in a whole new catalog and persists it.
    pub fn replace(&mut self, catalog: Catalog) {
        self.update(|current| *current = catalog);
    }

    /// Drops all admin edits and reloads the seed.
    pub fn reset(&mut self) {
        if let Err(e) = self.store.remove(StoreKey::MenuDataCustom.as_str()) {
            tracing::warn!("Failed to remove custom catalog: {}", e);
        }
        let (catalog, source) = load_seed(&self.seed);
        self.catalog = catalog;
        self.source = source;
    }

    /// Next free dish id: one past the largest id in the catalog or `batch`.
    /// `None` once `u64::MAX` is taken.
    pub fn next_id(&self, batch: &[Dish]) -> Option<u64> {
        next_id(&self.catalog, batch)
    }
}

pub(crate) fn next_id(catalog: &Catalog, batch: &[Dish]) -> Option<u64> {
    match catalog.dishes.iter().chain(batch).map(|d| d.id).max() {
        Some(max) => max.checked_add(1),
        None => Some(1),
    }
}

fn load_custom(store: &dyn KeyValueStore) -> Option<Catalog> {
    let raw = match store.get(StoreKey::MenuDataCustom.as_str()) {
        Ok(raw) => raw?,
        Err(e) => {
            tracing::warn!("Failed to read custom catalog: {}", e);
            return None;
        }
    };

    match Catalog::from_json(&raw) {
        Ok(catalog) => Some(catalog),
        Err(e) => {
            tracing::warn!("Ignoring stored custom catalog: {}", e);
            None
        }
    }
}

fn load_seed(seed: &str) -> (Catalog, CatalogSource) {
    match Catalog::from_json(seed) {
        Ok(catalog) => (catalog, CatalogSource::Seed),
        Err(e) => {
            tracing::warn!("Seed catalog unusable, starting empty: {}", e);
            (Catalog::default(), CatalogSource::Empty)
        }
    }
}
