//! Favorite dishes, kept in the order they were starred.

use crate::models::{Catalog, Dish};
use crate::store::{load_json, persist, SharedStore, StoreKey};

pub struct Favorites {
    store: SharedStore,
    ids: Vec<u64>,
}

impl Favorites {
    pub fn load(store: SharedStore) -> Self {
        let stored: Vec<u64> = load_json(store.as_ref(), StoreKey::Favorites).unwrap_or_default();

        // Older documents may carry repeats; keep the first occurrence.
        let mut ids = Vec::with_capacity(stored.len());
        for id in stored {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Self { store, ids }
    }

    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    pub fn is_favorite(&self, dish_id: u64) -> bool {
        self.ids.contains(&dish_id)
    }

    /// Adds or removes a dish. Returns the new membership state.
    pub fn toggle(&mut self, dish_id: u64) -> bool {
        let now_favorite = match self.ids.iter().position(|&id| id == dish_id) {
            Some(index) => {
                self.ids.remove(index);
                false
            }
            None => {
                self.ids.push(dish_id);
                true
            }
        };
        persist(self.store.as_ref(), StoreKey::Favorites, &self.ids);
        now_favorite
    }

    /// Favorites still present in the catalog, in favorite order.
    pub fn dishes<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Dish> {
        self.ids.iter().filter_map(|&id| catalog.dish(id)).collect()
    }
}
