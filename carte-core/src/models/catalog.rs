//! The menu catalog: ordered categories and dishes.
//!
//! Every catalog document crossing a load boundary goes through
//! [`Catalog::from_json`], which returns either a structurally valid catalog
//! or a typed [`CatalogError`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use super::dish::{Category, Dish};

/// Reasons a catalog document is rejected.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Catalog field '{0}' is missing or not a list")]
    Shape(&'static str),

    #[error("Catalog records do not match the expected layout: {0}")]
    Schema(#[source] serde_json::Error),

    #[error("Dish id {0} appears more than once")]
    DuplicateId(u64),

    #[error("Dish '{0}' has id 0; ids start at 1")]
    InvalidId(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    pub categories: Vec<Category>,
    pub dishes: Vec<Dish>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>, dishes: Vec<Dish>) -> Self {
        Self { categories, dishes }
    }

    /// Parses and validates a catalog document.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let value: serde_json::Value = serde_json::from_str(json).map_err(CatalogError::Parse)?;

        for field in ["categories", "dishes"] {
            if !value.get(field).is_some_and(serde_json::Value::is_array) {
                return Err(CatalogError::Shape(field));
            }
        }

        let catalog: Catalog = serde_json::from_value(value).map_err(CatalogError::Schema)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Checks id invariants: every id is at least 1 and unique.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::with_capacity(self.dishes.len());
        for dish in &self.dishes {
            if dish.id == 0 {
                return Err(CatalogError::InvalidId(dish.name.clone()));
            }
            if !seen.insert(dish.id) {
                return Err(CatalogError::DuplicateId(dish.id));
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.dishes.is_empty()
    }

    pub fn dish(&self, id: u64) -> Option<&Dish> {
        self.dishes.iter().find(|d| d.id == id)
    }

    pub fn dish_mut(&mut self, id: u64) -> Option<&mut Dish> {
        self.dishes.iter_mut().find(|d| d.id == id)
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Appends a category with this name unless one exists.
    /// Returns true if a category was created.
    pub fn ensure_category(&mut self, name: &str) -> bool {
        if self.category(name).is_some() {
            return false;
        }
        self.categories.push(Category::new(name));
        true
    }

    pub fn max_id(&self) -> Option<u64> {
        self.dishes.iter().map(|d| d.id).max()
    }

    /// Dishes whose category matches exactly. Unknown names yield nothing.
    pub fn dishes_in_category<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Dish> {
        self.dishes.iter().filter(move |d| d.category == name)
    }

    /// Case-insensitive substring search over name, ingredients and category.
    /// A blank query matches every dish.
    pub fn search(&self, query: &str) -> Vec<&Dish> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.dishes.iter().collect();
        }
        self.dishes
            .iter()
            .filter(|d| {
                d.name.to_lowercase().contains(&needle)
                    || d.ingredients.to_lowercase().contains(&needle)
                    || d.category.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn popular(&self) -> impl Iterator<Item = &Dish> {
        self.dishes.iter().filter(|d| d.popular)
    }
}
