//! Browsing the menu: listing, searching, dish details and categories.

use clap::{Args, Subcommand};
use std::collections::HashSet;

use super::OutputFormat;
use carte_core::{format_amount, Catalog, Dish, Favorites, MenuRepository};

#[derive(Args)]
pub struct MenuCommand {
    #[command(subcommand)]
    pub command: MenuSubcommand,
}

#[derive(Subcommand)]
pub enum MenuSubcommand {
    /// List dishes
    List {
        /// Only dishes of this category
        #[arg(long)]
        category: Option<String>,

        /// Case-insensitive search in names, ingredients and categories
        #[arg(long, short)]
        search: Option<String>,

        /// Only popular dishes
        #[arg(long, short)]
        popular: bool,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show dish details
    Show {
        /// Dish ID
        id: u64,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List categories
    Categories {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl MenuCommand {
    pub fn run(
        &self,
        repo: &MenuRepository,
        favorites: &Favorites,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let catalog = repo.catalog();

        match &self.command {
            MenuSubcommand::List {
                category,
                search,
                popular,
                format,
            } => {
                let dishes = filter_dishes(
                    catalog,
                    category.as_deref(),
                    search.as_deref(),
                    *popular,
                );

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&dishes)?);
                    }
                    OutputFormat::Text => {
                        if catalog.is_empty() {
                            println!("The menu is empty.");
                            return Ok(());
                        }
                        if dishes.is_empty() {
                            println!("No dishes found.");
                            return Ok(());
                        }
                        let favorite_ids: HashSet<u64> = favorites.ids().iter().copied().collect();
                        print_dish_table(&dishes, &favorite_ids);
                    }
                }
            }

            MenuSubcommand::Show { id, format } => {
                let dish = catalog
                    .dish(*id)
                    .ok_or_else(|| format!("Dish not found: {}", id))?;

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(dish)?);
                    }
                    OutputFormat::Text => {
                        print!("{}", dish);
                        if favorites.is_favorite(dish.id) {
                            println!("\nIn your favorites.");
                        }
                    }
                }
            }

            MenuSubcommand::Categories { format } => match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&catalog.categories)?);
                }
                OutputFormat::Text => {
                    if catalog.categories.is_empty() {
                        println!("No categories.");
                        return Ok(());
                    }
                    for category in &catalog.categories {
                        let count = catalog.dishes_in_category(&category.name).count();
                        println!("{} ({} dish(es))", category.name, count);
                    }
                }
            },
        }

        Ok(())
    }
}

/// Applies the list filters in turn: search, then category, then popular.
fn filter_dishes<'a>(
    catalog: &'a Catalog,
    category: Option<&str>,
    search: Option<&str>,
    popular: bool,
) -> Vec<&'a Dish> {
    catalog
        .search(search.unwrap_or(""))
        .into_iter()
        .filter(|d| category.map_or(true, |c| d.category == c))
        .filter(|d| !popular || d.popular)
        .collect()
}

fn print_dish_table(dishes: &[&Dish], favorite_ids: &HashSet<u64>) {
    let name_width = dishes
        .iter()
        .map(|d| d.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    println!(
        "{:>4}  {:<name_width$}  {:<12}  {:>8}",
        "ID", "Name", "Category", "Price"
    );
    println!("{}", "-".repeat(4 + 2 + name_width + 2 + 12 + 2 + 8 + 3));

    for dish in dishes {
        let mut marks = String::new();
        if dish.popular {
            marks.push('*');
        }
        if favorite_ids.contains(&dish.id) {
            marks.push('♥');
        }
        println!(
            "{:>4}  {:<name_width$}  {:<12}  {:>8} {}",
            dish.id,
            dish.name,
            dish.category,
            format_amount(dish.price),
            marks
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carte_core::Category;

    fn catalog() -> Catalog {
        Catalog::new(
            vec![Category::new("Plats"), Category::new("Boissons")],
            vec![
                Dish::new(1, "Plats", "Poulet yassa", 2500.0).with_popular(true),
                Dish::new(2, "Plats", "Mafé", 2000.0).with_ingredients("arachide"),
                Dish::new(3, "Boissons", "Bissap", 500.0).with_popular(true),
            ],
        )
    }

    fn ids(dishes: &[&Dish]) -> Vec<u64> {
        dishes.iter().map(|d| d.id).collect()
    }

    #[test]
    fn test_filter_without_options_lists_everything() {
        let catalog = catalog();
        assert_eq!(ids(&filter_dishes(&catalog, None, None, false)), vec![1, 2, 3]);
    }

    #[test]
    fn test_filter_by_category() {
        let catalog = catalog();
        assert_eq!(
            ids(&filter_dishes(&catalog, Some("Plats"), None, false)),
            vec![1, 2]
        );
        assert!(filter_dishes(&catalog, Some("Desserts"), None, false).is_empty());
    }

    #[test]
    fn test_filter_combines_search_and_popular() {
        let catalog = catalog();
        assert_eq!(
            ids(&filter_dishes(&catalog, None, Some("ARACHIDE"), false)),
            vec![2]
        );
        assert_eq!(ids(&filter_dishes(&catalog, None, None, true)), vec![1, 3]);
        assert!(filter_dishes(&catalog, None, Some("arachide"), true).is_empty());
    }
}
