//! Spreadsheet import and export of the menu.
//!
//! Import reads the first sheet of any workbook `calamine` recognises. Row 0
//! is a header whose labels are matched case-insensitively; the other rows
//! become dishes. Export writes a single "Menu" sheet with a fixed header.
//!
//! The header mapping and row conversion run on a plain grid of text cells
//! ([`catalog_from_grid`]) so they do not depend on a binary file.

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use rust_xlsxwriter::{Workbook, XlsxError};
use std::io::Cursor;
use thiserror::Error;

use crate::models::{Catalog, Category, Dish};
use crate::repository::next_id;

/// Header written by [`export_workbook`], in column order.
pub const EXPORT_HEADER: [&str; 7] = [
    "Categorie",
    "Nom",
    "Ingrédients",
    "Calories",
    "Protéines (g)",
    "Prix",
    "Image",
];

pub const EXPORT_SHEET_NAME: &str = "Menu";

pub const EXPORT_FILE_NAME: &str = "menu.xlsx";

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Could not read spreadsheet: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Spreadsheet has no sheets")]
    NoSheet,

    #[error("Spreadsheet header is missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<&'static str>),

    #[error("Spreadsheet has no rows with both a category and a name")]
    NoRows,

    #[error("No dish id left to allocate for row {0}")]
    IdsExhausted(usize),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write spreadsheet: {0}")]
    Xlsx(#[from] XlsxError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Category,
    Name,
    Ingredients,
    Calories,
    Proteins,
    Price,
    Image,
}

impl Column {
    fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "categorie" => Some(Column::Category),
            "nom" => Some(Column::Name),
            "ingrédients" | "ingredients" => Some(Column::Ingredients),
            "calories" => Some(Column::Calories),
            "protéines (g)" | "proteines (g)" => Some(Column::Proteins),
            "prix" => Some(Column::Price),
            "image" => Some(Column::Image),
            _ => None,
        }
    }
}

/// Column positions found in the header row.
#[derive(Debug, Default)]
struct ColumnMap {
    category: Option<usize>,
    name: Option<usize>,
    ingredients: Option<usize>,
    calories: Option<usize>,
    proteins: Option<usize>,
    price: Option<usize>,
    image: Option<usize>,
}

impl ColumnMap {
    fn from_header(header: &[String]) -> Result<Self, ImportError> {
        let mut map = ColumnMap::default();
        for (index, label) in header.iter().enumerate() {
            let slot = match Column::from_label(label) {
                Some(Column::Category) => &mut map.category,
                Some(Column::Name) => &mut map.name,
                Some(Column::Ingredients) => &mut map.ingredients,
                Some(Column::Calories) => &mut map.calories,
                Some(Column::Proteins) => &mut map.proteins,
                Some(Column::Price) => &mut map.price,
                Some(Column::Image) => &mut map.image,
                None => continue,
            };
            // First matching column wins
            slot.get_or_insert(index);
        }

        let missing: Vec<&'static str> = [
            ("Categorie", map.category),
            ("Nom", map.name),
            ("Prix", map.price),
        ]
        .into_iter()
        .filter(|(_, index)| index.is_none())
        .map(|(label, _)| label)
        .collect();

        if missing.is_empty() {
            Ok(map)
        } else {
            Err(ImportError::MissingColumns(missing))
        }
    }
}

/// Parses a cell as a number. A lone decimal comma (`12,5`) is accepted.
/// Blank, non-numeric and non-finite text is 0.
pub fn to_number(text: &str) -> f64 {
    let text = text.trim();
    let normalized = if text.contains('.') {
        text.to_string()
    } else {
        text.replacen(',', ".", 1)
    };
    normalized
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// Builds the replacement catalog from a grid of text cells.
///
/// Rows lacking a category or a name are skipped. New ids continue after
/// the largest id in `current` so they never reuse an existing one.
pub fn catalog_from_grid(grid: &[Vec<String>], current: &Catalog) -> Result<Catalog, ImportError> {
    let Some((header, rows)) = grid.split_first() else {
        return Err(ImportError::MissingColumns(vec!["Categorie", "Nom", "Prix"]));
    };
    let columns = ColumnMap::from_header(header)?;

    let mut dishes: Vec<Dish> = Vec::new();
    let mut categories: Vec<Category> = Vec::new();
    let mut skipped = 0usize;

    for (index, row) in rows.iter().enumerate() {
        let cell = |index: Option<usize>| cell_at(row, index);

        let category = cell(columns.category);
        let name = cell(columns.name);
        if category.is_empty() || name.is_empty() {
            skipped += 1;
            continue;
        }

        let image = cell(columns.image);
        let dish = Dish {
            id: next_id(current, &dishes).ok_or(ImportError::IdsExhausted(index + 2))?,
            category: category.to_string(),
            name: name.to_string(),
            ingredients: cell(columns.ingredients).to_string(),
            calories: to_number(cell(columns.calories)),
            proteins: to_number(cell(columns.proteins)),
            price: to_number(cell(columns.price)),
            image: (!image.is_empty()).then(|| image.to_string()),
            popular: false,
        };

        if !categories.iter().any(|c| c.name == dish.category) {
            categories.push(Category::new(dish.category.clone()));
        }
        dishes.push(dish);
    }

    if dishes.is_empty() {
        return Err(ImportError::NoRows);
    }
    if skipped > 0 {
        tracing::debug!("Skipped {} row(s) without category or name", skipped);
    }

    Ok(Catalog::new(categories, dishes))
}

fn cell_at(row: &[String], index: Option<usize>) -> &str {
    index
        .and_then(|i| row.get(i))
        .map(|s| s.trim())
        .unwrap_or("")
}

/// Reads the first sheet of a workbook as text cells.
pub fn read_grid(bytes: &[u8]) -> Result<Vec<Vec<String>>, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ImportError::NoSheet)??;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        other => other.to_string(),
    }
}

/// Parses a workbook into a replacement catalog.
pub fn import_workbook(bytes: &[u8], current: &Catalog) -> Result<Catalog, ImportError> {
    let grid = read_grid(bytes)?;
    catalog_from_grid(&grid, current)
}

/// One exported cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportCell {
    Empty,
    Text(String),
    Number(f64),
}

impl ExportCell {
    fn text(value: &str) -> Self {
        if value.is_empty() {
            ExportCell::Empty
        } else {
            ExportCell::Text(value.to_string())
        }
    }

    fn amount(value: f64) -> Self {
        if value == 0.0 {
            ExportCell::Empty
        } else {
            ExportCell::Number(value)
        }
    }
}

/// Rows below the header, one per dish, in [`EXPORT_HEADER`] order.
pub fn export_rows(catalog: &Catalog) -> Vec<[ExportCell; 7]> {
    catalog
        .dishes
        .iter()
        .map(|dish| {
            [
                ExportCell::text(&dish.category),
                ExportCell::text(&dish.name),
                ExportCell::text(&dish.ingredients),
                ExportCell::amount(dish.calories),
                ExportCell::amount(dish.proteins),
                ExportCell::Number(dish.price),
                ExportCell::text(dish.image.as_deref().unwrap_or("")),
            ]
        })
        .collect()
}

/// Serializes the catalog's dishes to an xlsx workbook.
pub fn export_workbook(catalog: &Catalog) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(EXPORT_SHEET_NAME)?;

    for (col, title) in EXPORT_HEADER.iter().enumerate() {
        worksheet.write_string(0, col as u16, *title)?;
    }

    for (index, row) in export_rows(catalog).iter().enumerate() {
        let row_num = (index + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            match cell {
                ExportCell::Empty => {}
                ExportCell::Text(text) => {
                    worksheet.write_string(row_num, col as u16, text.as_str())?;
                }
                ExportCell::Number(number) => {
                    worksheet.write_number(row_num, col as u16, *number)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}
