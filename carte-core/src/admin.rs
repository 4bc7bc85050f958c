//! Admin editing of the menu.
//!
//! All edits go through an [`Admin`] handle obtained from
//! [`AdminGate::unlock`]. The gate compares the passcode in plain text with
//! no hashing and no attempt limit: it keeps casual visitors out of the
//! editor and is not an access-control mechanism.

use thiserror::Error;

use crate::models::{Catalog, Category, Dish};
use crate::repository::MenuRepository;
use crate::spreadsheet::{self, ExportError, ImportError};

pub const DEFAULT_PASSCODE: &str = "1234";

/// A dish record that fails the required-field checks.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Missing or invalid field(s): {}", .fields.join(", "))]
pub struct ValidationError {
    pub fields: Vec<&'static str>,
}

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Incorrect admin passcode")]
    WrongPasscode,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("No dish id left to allocate")]
    IdsExhausted,

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

pub struct AdminGate {
    passcode: String,
}

impl AdminGate {
    pub fn new(passcode: impl Into<String>) -> Self {
        Self {
            passcode: passcode.into(),
        }
    }

    pub fn check(&self, attempt: &str) -> bool {
        attempt == self.passcode
    }

    /// Opens the editor on `repo` if the passcode matches.
    pub fn unlock<'r>(
        &self,
        attempt: &str,
        repo: &'r mut MenuRepository,
    ) -> Result<Admin<'r>, AdminError> {
        if !self.check(attempt) {
            tracing::info!("Rejected admin passcode");
            return Err(AdminError::WrongPasscode);
        }
        Ok(Admin { repo })
    }
}

impl Default for AdminGate {
    fn default() -> Self {
        Self::new(DEFAULT_PASSCODE)
    }
}

/// A dish record from the admin form or command line.
///
/// Every field is optional. When `id` names an existing dish the present
/// fields replace that dish's values and the rest are kept; otherwise a new
/// dish is created.
#[derive(Debug, Clone, Default)]
pub struct DishInput {
    pub id: Option<u64>,
    pub category: Option<String>,
    pub name: Option<String>,
    pub ingredients: Option<String>,
    pub calories: Option<f64>,
    pub proteins: Option<f64>,
    pub price: Option<f64>,
    /// An empty string clears the image.
    pub image: Option<String>,
    pub popular: Option<bool>,
}

impl DishInput {
    fn merge_into(self, mut dish: Dish) -> Dish {
        if let Some(category) = self.category {
            dish.category = category.trim().to_string();
        }
        if let Some(name) = self.name {
            dish.name = name.trim().to_string();
        }
        if let Some(ingredients) = self.ingredients {
            dish.ingredients = ingredients.trim().to_string();
        }
        if let Some(calories) = self.calories {
            dish.calories = calories;
        }
        if let Some(proteins) = self.proteins {
            dish.proteins = proteins;
        }
        if let Some(price) = self.price {
            dish.price = price;
        }
        if let Some(image) = self.image {
            let image = image.trim();
            dish.image = (!image.is_empty()).then(|| image.to_string());
        }
        if let Some(popular) = self.popular {
            dish.popular = popular;
        }
        dish
    }
}

fn validate(dish: &Dish) -> Result<(), ValidationError> {
    let mut fields = Vec::new();
    if dish.name.is_empty() {
        fields.push("name");
    }
    if dish.category.is_empty() {
        fields.push("category");
    }
    if !(dish.price.is_finite() && dish.price > 0.0) {
        fields.push("price");
    }
    if !(dish.calories.is_finite() && dish.calories >= 0.0) {
        fields.push("calories");
    }
    if !(dish.proteins.is_finite() && dish.proteins >= 0.0) {
        fields.push("proteins");
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { fields })
    }
}

/// Result of a successful spreadsheet import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    pub dishes: usize,
    pub categories: usize,
    pub first_id: u64,
}

/// Unlocked editor over the menu repository.
pub struct Admin<'r> {
    repo: &'r mut MenuRepository,
}

impl Admin<'_> {
    pub fn catalog(&self) -> &Catalog {
        self.repo.catalog()
    }

    /// Creates or updates a dish and returns it as stored.
    ///
    /// The merged record is validated before anything changes. The dish's
    /// category is created if the catalog does not have it yet.
    pub fn save_dish(&mut self, input: DishInput) -> Result<Dish, AdminError> {
        let existing = input.id.and_then(|id| self.repo.catalog().dish(id).cloned());
        let is_update = existing.is_some();

        let mut dish = input.merge_into(existing.unwrap_or_else(|| Dish::new(0, "", "", 0.0)));
        validate(&dish)?;

        if !is_update {
            dish.id = self.repo.next_id(&[]).ok_or(AdminError::IdsExhausted)?;
        }

        let saved = dish.clone();
        self.repo.update(|catalog| {
            match catalog.dish_mut(dish.id) {
                Some(slot) => *slot = dish,
                None => catalog.dishes.push(dish),
            }
            if catalog.ensure_category(&saved.category) {
                tracing::debug!("Created category '{}'", saved.category);
            }
        });

        tracing::info!(
            "{} dish {} '{}'",
            if is_update { "Updated" } else { "Created" },
            saved.id,
            saved.name
        );
        Ok(saved)
    }

    /// Deletes a dish. Returns false if no dish has this id.
    pub fn delete_dish(&mut self, dish_id: u64) -> bool {
        if self.repo.catalog().dish(dish_id).is_none() {
            tracing::debug!("Ignoring delete for unknown dish {}", dish_id);
            return false;
        }
        self.repo
            .update(|catalog| catalog.dishes.retain(|d| d.id != dish_id));
        tracing::info!("Deleted dish {}", dish_id);
        true
    }

    /// Adds a category, or sets the image of an existing one.
    pub fn save_category(&mut self, name: &str, image: Option<&str>) -> Result<(), AdminError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError {
                fields: vec!["category"],
            }
            .into());
        }

        let image = image.map(str::trim).filter(|i| !i.is_empty());
        self.repo.update(|catalog| {
            match catalog.categories.iter_mut().find(|c| c.name == name) {
                Some(category) => {
                    if let Some(image) = image {
                        category.image = Some(image.to_string());
                    }
                }
                None => {
                    let mut category = Category::new(name);
                    category.image = image.map(str::to_string);
                    catalog.categories.push(category);
                }
            }
        });
        Ok(())
    }

    /// Removes a category entry. Dishes that reference it are kept.
    pub fn remove_category(&mut self, name: &str) -> bool {
        if self.repo.catalog().category(name).is_none() {
            tracing::debug!("Ignoring removal of unknown category '{}'", name);
            return false;
        }
        self.repo
            .update(|catalog| catalog.categories.retain(|c| c.name != name));
        true
    }

    /// Replaces the whole catalog with the contents of a workbook.
    /// On any error the catalog is left untouched.
    pub fn import(&mut self, bytes: &[u8]) -> Result<ImportSummary, AdminError> {
        let catalog = spreadsheet::import_workbook(bytes, self.repo.catalog())?;
        Ok(self.commit_import(catalog))
    }

    /// Same as [`Admin::import`] for a grid of text cells.
    pub fn import_grid(&mut self, grid: &[Vec<String>]) -> Result<ImportSummary, AdminError> {
        let catalog = spreadsheet::catalog_from_grid(grid, self.repo.catalog())?;
        Ok(self.commit_import(catalog))
    }

    fn commit_import(&mut self, catalog: Catalog) -> ImportSummary {
        let summary = ImportSummary {
            dishes: catalog.dishes.len(),
            categories: catalog.categories.len(),
            first_id: catalog.dishes.first().map_or(0, |d| d.id),
        };
        self.repo.replace(catalog);
        tracing::info!(
            "Imported {} dish(es) in {} categories",
            summary.dishes,
            summary.categories
        );
        summary
    }

    /// Serializes every dish to an xlsx workbook.
    pub fn export(&self) -> Result<Vec<u8>, AdminError> {
        Ok(spreadsheet::export_workbook(self.repo.catalog())?)
    }

    /// Discards all edits and returns to the seed menu.
    pub fn reset(&mut self) {
        self.repo.reset();
        tracing::info!("Catalog reset to seed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::CatalogSource;
    use crate::store::{KeyValueStore, MemoryStore};
    use std::sync::Arc;

    const SEED: &str = r#"{
        "categories": [{"name": "Plats"}],
        "dishes": [
            {"id": 1, "category": "Plats", "name": "Poulet", "ingredients": "poulet",
             "calories": 600, "price": 2500, "image": "poulet.jpg"},
            {"id": 3, "category": "Plats", "name": "Mafé", "price": 2000}
        ]
    }"#;

    fn repo() -> (MenuRepository, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (MenuRepository::load(store.clone(), SEED), store)
    }

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_wrong_passcode_rejected() {
        let (mut repo, _store) = repo();
        let gate = AdminGate::new("secret");
        assert!(matches!(
            gate.unlock("Secret", &mut repo),
            Err(AdminError::WrongPasscode)
        ));
        assert!(gate.unlock("secret", &mut repo).is_ok());
    }

    #[test]
    fn test_default_passcode() {
        let gate = AdminGate::default();
        assert!(gate.check(DEFAULT_PASSCODE));
        assert!(!gate.check(""));
    }

    #[test]
    fn test_create_fails_when_ids_exhausted() {
        let seed = format!(
            r#"{{"categories": [{{"name": "Plats"}}],
                "dishes": [{{"id": {}, "category": "Plats", "name": "Dernier", "price": 100}}]}}"#,
            u64::MAX
        );
        let store = Arc::new(MemoryStore::new());
        let mut repo = MenuRepository::load(store.clone(), seed);
        let mut admin = AdminGate::default().unlock("1234", &mut repo).unwrap();

        let result = admin.save_dish(DishInput {
            category: Some("Plats".into()),
            name: Some("Nouveau".into()),
            price: Some(1000.0),
            ..Default::default()
        });

        assert!(matches!(result, Err(AdminError::IdsExhausted)));
        assert_eq!(admin.catalog().dishes.len(), 1);
        assert_eq!(store.get("menuDataCustom").unwrap(), None);

        // Updating the existing dish still works
        let updated = admin
            .save_dish(DishInput {
                id: Some(u64::MAX),
                price: Some(150.0),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(updated.price, 150.0);
    }

    #[test]
    fn test_create_allocates_next_id_and_category() {
        let (mut repo, store) = repo();
        let mut admin = AdminGate::default().unlock("1234", &mut repo).unwrap();

        let dish = admin
            .save_dish(DishInput {
                category: Some("Desserts".into()),
                name: Some(" Thiakry ".into()),
                price: Some(1000.0),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(dish.id, 4);
        assert_eq!(dish.name, "Thiakry");
        assert!(admin.catalog().category("Desserts").is_some());
        assert_eq!(admin.catalog().dishes.last().unwrap().id, 4);

        let stored = store.get("menuDataCustom").unwrap().unwrap();
        assert!(stored.contains("Thiakry"));
        assert_eq!(repo.source(), CatalogSource::Custom);
    }

    #[test]
    fn test_unknown_id_creates_new_dish() {
        let (mut repo, _store) = repo();
        let mut admin = AdminGate::default().unlock("1234", &mut repo).unwrap();

        let dish = admin
            .save_dish(DishInput {
                id: Some(99),
                category: Some("Plats".into()),
                name: Some("Yassa".into()),
                price: Some(2500.0),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(dish.id, 4);
        assert!(admin.catalog().dish(99).is_none());
    }

    #[test]
    fn test_update_merges_fields_in_place() {
        let (mut repo, _store) = repo();
        let mut admin = AdminGate::default().unlock("1234", &mut repo).unwrap();

        let dish = admin
            .save_dish(DishInput {
                id: Some(1),
                price: Some(2800.0),
                popular: Some(true),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(dish.id, 1);
        assert_eq!(dish.name, "Poulet");
        assert_eq!(dish.ingredients, "poulet");
        assert_eq!(dish.calories, 600.0);
        assert_eq!(dish.image.as_deref(), Some("poulet.jpg"));
        assert_eq!(dish.price, 2800.0);
        assert!(dish.popular);

        // Position and count unchanged
        assert_eq!(admin.catalog().dishes.len(), 2);
        assert_eq!(admin.catalog().dishes[0], dish);
    }

    #[test]
    fn test_update_with_empty_image_clears_it() {
        let (mut repo, _store) = repo();
        let mut admin = AdminGate::default().unlock("1234", &mut repo).unwrap();
        let dish = admin
            .save_dish(DishInput {
                id: Some(1),
                image: Some(String::new()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(dish.image, None);
    }

    #[test]
    fn test_create_missing_required_fields_rejected() {
        let (mut repo, store) = repo();
        let before = repo.catalog().clone();
        let mut admin = AdminGate::default().unlock("1234", &mut repo).unwrap();

        let err = admin
            .save_dish(DishInput {
                name: Some("Yassa".into()),
                ..Default::default()
            })
            .unwrap_err();

        match err {
            AdminError::Validation(e) => assert_eq!(e.fields, vec!["category", "price"]),
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(admin.catalog(), &before);
        assert_eq!(store.get("menuDataCustom").unwrap(), None);
    }

    #[test]
    fn test_update_blanking_name_rejected() {
        let (mut repo, _store) = repo();
        let mut admin = AdminGate::default().unlock("1234", &mut repo).unwrap();
        let err = admin
            .save_dish(DishInput {
                id: Some(3),
                name: Some("   ".into()),
                price: Some(-5.0),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing or invalid field(s): name, price");
        assert_eq!(admin.catalog().dish(3).unwrap().name, "Mafé");
    }

    #[test]
    fn test_delete() {
        let (mut repo, _store) = repo();
        let mut admin = AdminGate::default().unlock("1234", &mut repo).unwrap();

        assert!(admin.delete_dish(1));
        assert!(admin.catalog().dish(1).is_none());
        assert!(!admin.delete_dish(1));
        assert_eq!(admin.catalog().dishes.len(), 1);
    }

    #[test]
    fn test_save_and_remove_category() {
        let (mut repo, _store) = repo();
        let mut admin = AdminGate::default().unlock("1234", &mut repo).unwrap();

        admin.save_category("Boissons", Some("boissons.jpg")).unwrap();
        admin.save_category("Plats", Some("plats.jpg")).unwrap();
        assert_eq!(admin.catalog().categories.len(), 2);
        assert_eq!(
            admin.catalog().category("Plats").unwrap().image.as_deref(),
            Some("plats.jpg")
        );

        assert!(admin.save_category("  ", None).is_err());

        assert!(admin.remove_category("Plats"));
        assert!(!admin.remove_category("Plats"));
        // Dishes keep their orphaned category
        assert_eq!(admin.catalog().dishes_in_category("Plats").count(), 2);
    }

    #[test]
    fn test_import_missing_price_leaves_catalog_untouched() {
        let (mut repo, store) = repo();
        {
            let mut admin = AdminGate::default().unlock("1234", &mut repo).unwrap();
            admin.delete_dish(3);
        }
        let stored_before = store.get("menuDataCustom").unwrap();
        let json_before = serde_json::to_string(repo.catalog()).unwrap();

        let mut admin = AdminGate::default().unlock("1234", &mut repo).unwrap();
        let err = admin
            .import_grid(&grid(&[&["Categorie", "Nom"], &["Plats", "Yassa"]]))
            .unwrap_err();
        assert!(matches!(
            err,
            AdminError::Import(ImportError::MissingColumns(_))
        ));

        assert_eq!(serde_json::to_string(admin.catalog()).unwrap(), json_before);
        assert_eq!(store.get("menuDataCustom").unwrap(), stored_before);
    }

    #[test]
    fn test_import_replaces_catalog() {
        let (mut repo, _store) = repo();
        let mut admin = AdminGate::default().unlock("1234", &mut repo).unwrap();

        let summary = admin
            .import_grid(&grid(&[
                &["Categorie", "Nom", "Prix"],
                &["Boissons", "Bissap", "500"],
                &["Boissons", "Bouye", "700"],
            ]))
            .unwrap();

        assert_eq!(
            summary,
            ImportSummary {
                dishes: 2,
                categories: 1,
                first_id: 4,
            }
        );
        let ids: Vec<u64> = admin.catalog().dishes.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![4, 5]);
        assert!(admin.catalog().category("Plats").is_none());
    }

    #[test]
    fn test_export_then_import_roundtrip() {
        let (mut repo, _store) = repo();
        let mut admin = AdminGate::default().unlock("1234", &mut repo).unwrap();

        let bytes = admin.export().unwrap();
        let summary = admin.import(&bytes).unwrap();

        assert_eq!(summary.dishes, 2);
        let names: Vec<&str> = admin
            .catalog()
            .dishes
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["Poulet", "Mafé"]);
    }

    #[test]
    fn test_reset_restores_seed() {
        let (mut repo, store) = repo();
        let mut admin = AdminGate::default().unlock("1234", &mut repo).unwrap();
        admin.delete_dish(1);
        admin.reset();

        assert_eq!(admin.catalog().dishes.len(), 2);
        assert_eq!(store.get("menuDataCustom").unwrap(), None);
    }
}
