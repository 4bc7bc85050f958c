mod catalog;
mod dish;

pub use catalog::{Catalog, CatalogError};
pub use dish::{format_amount, Category, Dish};
