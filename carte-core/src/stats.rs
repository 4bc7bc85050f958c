//! Cumulative order statistics for the leaderboard.
//!
//! Counters only ever grow. Maps keep first-seen order, and the top-N
//! queries sort stably, so equal counts rank in the order they first
//! appeared.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::cart::CartLine;
use crate::store::{load_json, persist, SharedStore, StoreKey};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderStats {
    /// Quantity ordered per dish id (as a string key).
    #[serde(default)]
    pub dishes: IndexMap<String, u64>,
    /// Quantity ordered per category name.
    #[serde(default)]
    pub categories: IndexMap<String, u64>,
}

impl OrderStats {
    pub fn dish_count(&self, dish_id: u64) -> u64 {
        self.dishes.get(&dish_id.to_string()).copied().unwrap_or(0)
    }

    pub fn category_count(&self, category: &str) -> u64 {
        self.categories.get(category).copied().unwrap_or(0)
    }

    fn add(&mut self, line: &CartLine) {
        let quantity = u64::from(line.quantity);
        *self.dishes.entry(line.dish.id.to_string()).or_insert(0) += quantity;
        *self
            .categories
            .entry(line.dish.category.clone())
            .or_insert(0) += quantity;
    }
}

pub struct StatsRecorder {
    store: SharedStore,
    stats: OrderStats,
}

impl StatsRecorder {
    pub fn load(store: SharedStore) -> Self {
        let stats = load_json(store.as_ref(), StoreKey::OrderStats).unwrap_or_default();
        Self { store, stats }
    }

    pub fn stats(&self) -> &OrderStats {
        &self.stats
    }

    /// Adds the quantities of a completed order. Empty orders are ignored.
    pub fn record(&mut self, lines: &[CartLine]) {
        if lines.is_empty() {
            return;
        }
        for line in lines {
            self.stats.add(line);
        }
        persist(self.store.as_ref(), StoreKey::OrderStats, &self.stats);
    }

    /// The `n` most ordered dish ids with their counts.
    pub fn top_dishes(&self, n: usize) -> Vec<(String, u64)> {
        top(&self.stats.dishes, n)
    }

    /// The `n` most ordered categories with their counts.
    pub fn top_categories(&self, n: usize) -> Vec<(String, u64)> {
        top(&self.stats.categories, n)
    }
}

fn top(counts: &IndexMap<String, u64>, n: usize) -> Vec<(String, u64)> {
    let mut entries: Vec<(String, u64)> = counts.iter().map(|(k, &v)| (k.clone(), v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(n);
    entries
}
