use clap::{Args, Subcommand};
use serde::Serialize;

use super::OutputFormat;
use carte_core::{format_amount, Cart, CartLine, MenuRepository};

#[derive(Args)]
pub struct CartCommand {
    #[command(subcommand)]
    pub command: CartSubcommand,
}

#[derive(Subcommand)]
pub enum CartSubcommand {
    /// Add one unit of a dish
    Add {
        /// Dish ID
        id: u64,
    },

    /// Remove one unit of a dish
    Remove {
        /// Dish ID
        id: u64,
    },

    /// Empty the cart
    Clear,

    /// Show the cart contents and total
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Serialize)]
struct CartView<'a> {
    lines: &'a [CartLine],
    count: u32,
    total: f64,
}

impl CartCommand {
    pub fn run(
        &self,
        cart: &mut Cart,
        repo: &MenuRepository,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            CartSubcommand::Add { id } => {
                if !cart.add(repo.catalog(), *id) {
                    return Err(format!("Dish not found: {}", id).into());
                }
                let name = repo
                    .catalog()
                    .dish(*id)
                    .map_or_else(|| id.to_string(), |d| d.name.clone());
                println!(
                    "Added {} (x{} in cart, total {})",
                    name,
                    cart.quantity_of(*id),
                    format_amount(cart.total())
                );
            }

            CartSubcommand::Remove { id } => {
                if !cart.remove(*id) {
                    return Err(format!("Dish {} is not in the cart", id).into());
                }
                println!(
                    "Removed one unit of dish {} ({} left)",
                    id,
                    cart.quantity_of(*id)
                );
            }

            CartSubcommand::Clear => {
                cart.clear();
                println!("Cart cleared.");
            }

            CartSubcommand::Show { format } => match format {
                OutputFormat::Json => {
                    let view = CartView {
                        lines: cart.lines(),
                        count: cart.count(),
                        total: cart.total(),
                    };
                    println!("{}", serde_json::to_string_pretty(&view)?);
                }
                OutputFormat::Text => {
                    if cart.is_empty() {
                        println!("Your cart is empty.");
                        return Ok(());
                    }
                    for line in cart.lines() {
                        println!("{}", line);
                    }
                    println!();
                    println!("Items: {}", cart.count());
                    println!("Total: {}", format_amount(cart.total()));
                }
            },
        }

        Ok(())
    }
}
