use clap::{Args, Subcommand};

use super::OutputFormat;
use carte_core::{format_amount, Favorites, MenuRepository};

#[derive(Args)]
pub struct FavCommand {
    #[command(subcommand)]
    pub command: FavSubcommand,
}

#[derive(Subcommand)]
pub enum FavSubcommand {
    /// Add a dish to favorites, or remove it if already there
    Toggle {
        /// Dish ID
        id: u64,
    },

    /// List favorite dishes still on the menu
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl FavCommand {
    pub fn run(
        &self,
        favorites: &mut Favorites,
        repo: &MenuRepository,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            FavSubcommand::Toggle { id } => {
                if favorites.toggle(*id) {
                    println!("Added dish {} to favorites.", id);
                } else {
                    println!("Removed dish {} from favorites.", id);
                }
            }

            FavSubcommand::List { format } => {
                let dishes = favorites.dishes(repo.catalog());
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&dishes)?);
                    }
                    OutputFormat::Text => {
                        if dishes.is_empty() {
                            println!("No favorites yet.");
                            return Ok(());
                        }
                        for dish in dishes {
                            println!(
                                "#{} {} ({}) {}",
                                dish.id,
                                dish.name,
                                dish.category,
                                format_amount(dish.price)
                            );
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
