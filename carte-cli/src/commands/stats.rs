use clap::Args;
use serde::Serialize;

use super::OutputFormat;
use carte_core::{MenuRepository, StatsRecorder};

#[derive(Args)]
pub struct StatsCommand {
    /// Number of entries per leaderboard
    #[arg(long, short, default_value = "5")]
    top: usize,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Serialize)]
struct Leaderboard {
    dishes: Vec<(String, u64)>,
    categories: Vec<(String, u64)>,
}

impl StatsCommand {
    pub fn run(
        &self,
        stats: &StatsRecorder,
        repo: &MenuRepository,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let board = Leaderboard {
            dishes: stats.top_dishes(self.top),
            categories: stats.top_categories(self.top),
        };

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&board)?);
            }
            OutputFormat::Text => {
                if board.dishes.is_empty() {
                    println!("No orders recorded yet.");
                    return Ok(());
                }

                println!("Top dishes");
                println!("==========");
                for (rank, (id, count)) in board.dishes.iter().enumerate() {
                    println!("{}. {} ({})", rank + 1, dish_label(repo, id), count);
                }
                println!();
                println!("Top categories");
                println!("==============");
                for (rank, (name, count)) in board.categories.iter().enumerate() {
                    println!("{}. {} ({})", rank + 1, name, count);
                }
            }
        }

        Ok(())
    }
}

/// Dish name for a stats key; deleted dishes show their id.
fn dish_label(repo: &MenuRepository, key: &str) -> String {
    key.parse::<u64>()
        .ok()
        .and_then(|id| repo.catalog().dish(id))
        .map_or_else(|| format!("#{}", key), |d| d.name.clone())
}
