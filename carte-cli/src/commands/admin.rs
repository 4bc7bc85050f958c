//! Admin editing commands. Every subcommand asks for the passcode first.

use clap::{Args, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::config::Config;
use carte_core::{AdminGate, DishInput, MenuRepository, EXPORT_FILE_NAME};

#[derive(Args)]
pub struct AdminCommand {
    /// Admin passcode (prompted for when omitted)
    #[arg(long, global = true)]
    passcode: Option<String>,

    #[command(subcommand)]
    pub command: AdminSubcommand,
}

#[derive(Subcommand)]
pub enum AdminSubcommand {
    /// Create a dish, or update one when --id names an existing dish
    Save(DishArgs),

    /// Delete a dish
    Delete {
        /// Dish ID
        id: u64,
    },

    /// Manage categories
    Category {
        #[command(subcommand)]
        command: CategorySubcommand,
    },

    /// Replace the whole menu with the contents of a spreadsheet
    Import {
        /// Spreadsheet file (.xlsx, .xls, .ods)
        file: PathBuf,

        /// Skip confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Export the menu to an xlsx spreadsheet
    Export {
        /// Output file
        #[arg(long, short, default_value = EXPORT_FILE_NAME)]
        output: PathBuf,
    },

    /// Discard all menu edits and return to the seed menu
    Reset {
        /// Skip confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum CategorySubcommand {
    /// Add a category, or set the image of an existing one
    Add {
        /// Category name
        name: String,

        /// Image URL
        #[arg(long)]
        image: Option<String>,
    },

    /// Remove a category (its dishes are kept)
    Remove {
        /// Category name
        name: String,
    },
}

#[derive(Args)]
pub struct DishArgs {
    /// ID of the dish to update
    #[arg(long)]
    id: Option<u64>,

    /// Dish name
    #[arg(long, short)]
    name: Option<String>,

    /// Category name (created if missing)
    #[arg(long)]
    category: Option<String>,

    /// Ingredients, free text
    #[arg(long)]
    ingredients: Option<String>,

    /// Calories (kcal)
    #[arg(long)]
    calories: Option<f64>,

    /// Proteins (g)
    #[arg(long)]
    proteins: Option<f64>,

    /// Price
    #[arg(long, short)]
    price: Option<f64>,

    /// Image URL (empty to clear)
    #[arg(long)]
    image: Option<String>,

    /// Mark as popular
    #[arg(long)]
    popular: Option<bool>,
}

impl From<&DishArgs> for DishInput {
    fn from(args: &DishArgs) -> Self {
        DishInput {
            id: args.id,
            category: args.category.clone(),
            name: args.name.clone(),
            ingredients: args.ingredients.clone(),
            calories: args.calories,
            proteins: args.proteins,
            price: args.price,
            image: args.image.clone(),
            popular: args.popular,
        }
    }
}

impl AdminCommand {
    pub fn run(
        &self,
        repo: &mut MenuRepository,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let attempt = match &self.passcode {
            Some(passcode) => passcode.clone(),
            None => prompt("Admin passcode: ")?,
        };
        let gate = AdminGate::new(config.admin_passcode.value.clone());
        let mut admin = gate.unlock(&attempt, repo)?;

        match &self.command {
            AdminSubcommand::Save(args) => {
                let exists = args.id.is_some_and(|id| admin.catalog().dish(id).is_some());
                let dish = admin.save_dish(DishInput::from(args))?;
                let verb = if exists { "Updated" } else { "Created" };
                println!("{} dish:", verb);
                println!();
                print!("{}", dish);
            }

            AdminSubcommand::Delete { id } => {
                if !admin.delete_dish(*id) {
                    return Err(format!("Dish not found: {}", id).into());
                }
                println!("Deleted dish {}", id);
            }

            AdminSubcommand::Category { command } => match command {
                CategorySubcommand::Add { name, image } => {
                    admin.save_category(name, image.as_deref())?;
                    println!("Saved category '{}'", name.trim());
                }
                CategorySubcommand::Remove { name } => {
                    if !admin.remove_category(name) {
                        return Err(format!("Category not found: {}", name).into());
                    }
                    println!("Removed category '{}'", name);
                }
            },

            AdminSubcommand::Import { file, yes } => {
                let bytes = fs::read(file)
                    .map_err(|e| format!("Failed to read '{}': {}", file.display(), e))?;

                if !yes
                    && !confirm(&format!(
                        "Replace all {} dish(es) with the contents of '{}'?",
                        admin.catalog().dishes.len(),
                        file.display()
                    ))?
                {
                    println!("Cancelled.");
                    return Ok(());
                }

                let summary = admin.import(&bytes)?;
                println!(
                    "Imported {} dish(es) in {} categories (ids from {}).",
                    summary.dishes, summary.categories, summary.first_id
                );
            }

            AdminSubcommand::Export { output } => {
                let bytes = admin.export()?;
                fs::write(output, bytes)
                    .map_err(|e| format!("Failed to write '{}': {}", output.display(), e))?;
                println!(
                    "Exported {} dish(es) to {}",
                    admin.catalog().dishes.len(),
                    output.display()
                );
            }

            AdminSubcommand::Reset { yes } => {
                if !yes && !confirm("Discard all menu edits?")? {
                    println!("Cancelled.");
                    return Ok(());
                }
                admin.reset();
                println!("Menu reset.");
            }
        }

        Ok(())
    }
}

fn prompt(label: &str) -> Result<String, io::Error> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

fn confirm(question: &str) -> Result<bool, io::Error> {
    let answer = prompt(&format!("{} [y/N] ", question))?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
