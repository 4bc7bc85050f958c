mod admin;
mod cart;
mod checkout;
mod config_cmd;
mod fav;
mod menu;
mod stats;

pub use admin::AdminCommand;
pub use cart::CartCommand;
pub use checkout::CheckoutCommand;
pub use config_cmd::ConfigCommand;
pub use fav::FavCommand;
pub use menu::MenuCommand;
pub use stats::StatsCommand;

use clap::ValueEnum;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
