//! Shopping cart.
//!
//! One [`CartLine`] per distinct dish. Lines hold a copy of the dish taken
//! when it was first added, so later catalog edits do not change what is
//! already in the cart. The cart is persisted after every mutation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{format_amount, Catalog, Dish};
use crate::store::{load_json, persist, SharedStore, StoreKey};

/// A dish snapshot plus the ordered quantity (always at least 1).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    #[serde(flatten)]
    pub dish: Dish,
    pub quantity: u32,
}

impl CartLine {
    pub fn new(dish: Dish) -> Self {
        Self { dish, quantity: 1 }
    }

    pub fn line_total(&self) -> f64 {
        self.dish.price * f64::from(self.quantity)
    }
}

impl fmt::Display for CartLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x {} ({})",
            self.quantity,
            self.dish.name,
            format_amount(self.line_total())
        )
    }
}

pub struct Cart {
    store: SharedStore,
    lines: Vec<CartLine>,
}

impl Cart {
    /// Loads the persisted cart; an absent or unreadable cart starts empty.
    pub fn load(store: SharedStore) -> Self {
        let stored: Vec<CartLine> = load_json(store.as_ref(), StoreKey::Cart).unwrap_or_default();

        // One line per dish: repeats fold into the first snapshot.
        let mut lines: Vec<CartLine> = Vec::with_capacity(stored.len());
        for line in stored.into_iter().filter(|l| l.quantity > 0) {
            match lines.iter_mut().find(|l| l.dish.id == line.dish.id) {
                Some(first) => first.quantity = first.quantity.saturating_add(line.quantity),
                None => lines.push(line),
            }
        }
        Self { store, lines }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Adds one unit of a catalog dish.
    ///
    /// Returns false if the dish is not in the catalog (it may have been
    /// deleted since it was displayed); the cart is left untouched.
    pub fn add(&mut self, catalog: &Catalog, dish_id: u64) -> bool {
        if let Some(line) = self.lines.iter_mut().find(|l| l.dish.id == dish_id) {
            line.quantity += 1;
        } else {
            let Some(dish) = catalog.dish(dish_id) else {
                tracing::debug!("Ignoring add for unknown dish {}", dish_id);
                return false;
            };
            self.lines.push(CartLine::new(dish.clone()));
        }
        self.save();
        true
    }

    /// Removes one unit of a dish, dropping the line when it reaches zero.
    /// Returns false if the dish is not in the cart.
    pub fn remove(&mut self, dish_id: u64) -> bool {
        let Some(index) = self.lines.iter().position(|l| l.dish.id == dish_id) else {
            tracing::debug!("Ignoring remove for dish {} not in cart", dish_id);
            return false;
        };

        if self.lines[index].quantity > 1 {
            self.lines[index].quantity -= 1;
        } else {
            self.lines.remove(index);
        }
        self.save();
        true
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.save();
    }

    /// Sum of price times quantity over all lines.
    pub fn total(&self) -> f64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Number of units in the cart (not the number of lines).
    pub fn count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn quantity_of(&self, dish_id: u64) -> u32 {
        self.lines
            .iter()
            .find(|l| l.dish.id == dish_id)
            .map_or(0, |l| l.quantity)
    }

    fn save(&self) -> bool {
        persist(self.store.as_ref(), StoreKey::Cart, &self.lines)
    }
}
