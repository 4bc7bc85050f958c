//! Carte Core Library
//!
//! Menu catalog, cart, favorites, order statistics and admin editing for a
//! restaurant storefront. Every engine owns its state and persists it as
//! JSON through a [`KeyValueStore`].

pub mod admin;
pub mod cart;
pub mod checkout;
pub mod favorites;
pub mod models;
pub mod repository;
pub mod spreadsheet;
pub mod stats;
pub mod store;

pub use admin::{Admin, AdminError, AdminGate, DishInput, ImportSummary, ValidationError};
pub use cart::{Cart, CartLine};
pub use checkout::{checkout, CheckoutError, CheckoutOptions, OrderLine, OrderSummary};
pub use favorites::Favorites;
pub use models::{format_amount, Catalog, CatalogError, Category, Dish};
pub use repository::{CatalogSource, MenuRepository, BUNDLED_SEED};
pub use spreadsheet::{ExportError, ImportError, EXPORT_FILE_NAME};
pub use stats::{OrderStats, StatsRecorder};
pub use store::{FileStore, KeyValueStore, MemoryStore, SharedStore, StoreError, StoreKey};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
