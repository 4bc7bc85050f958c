use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use carte_core::{Cart, Favorites, FileStore, MenuRepository, SharedStore, StatsRecorder};
use commands::{
    AdminCommand, CartCommand, CheckoutCommand, ConfigCommand, FavCommand, MenuCommand,
    StatsCommand,
};
use config::Config;

#[derive(Parser)]
#[command(name = "carte")]
#[command(version)]
#[command(about = "Restaurant menu, cart and ordering from the terminal", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the menu
    Menu(MenuCommand),

    /// Manage the cart
    Cart(CartCommand),

    /// Manage favorite dishes
    Fav(FavCommand),

    /// Send the cart as an order and empty it
    Checkout(CheckoutCommand),

    /// Show the most ordered dishes and categories
    Stats(StatsCommand),

    /// Edit the menu (passcode required)
    Admin(AdminCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Save config path for init command
    let cli_config_path = cli.config.clone();

    // Load configuration
    let config = Config::load(cli.config)?;

    execute_command(&cli.command, &config, cli_config_path)
}

fn execute_command(
    command: &Option<Commands>,
    config: &Config,
    cli_config_path: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Some(Commands::Menu(cmd)) => {
            let (store, repo) = open_menu(config)?;
            let favorites = Favorites::load(store);
            cmd.run(&repo, &favorites)?;
        }
        Some(Commands::Cart(cmd)) => {
            let (store, repo) = open_menu(config)?;
            let mut cart = Cart::load(store);
            cmd.run(&mut cart, &repo)?;
        }
        Some(Commands::Fav(cmd)) => {
            let (store, repo) = open_menu(config)?;
            let mut favorites = Favorites::load(store);
            cmd.run(&mut favorites, &repo)?;
        }
        Some(Commands::Checkout(cmd)) => {
            let store = open_store(config);
            let mut cart = Cart::load(store.clone());
            let mut stats = StatsRecorder::load(store);
            cmd.run(&mut cart, &mut stats, config)?;
        }
        Some(Commands::Stats(cmd)) => {
            let (store, repo) = open_menu(config)?;
            let stats = StatsRecorder::load(store);
            cmd.run(&stats, &repo)?;
        }
        Some(Commands::Admin(cmd)) => {
            let (_, mut repo) = open_menu(config)?;
            cmd.run(&mut repo, config)?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(config, cli_config_path)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

fn open_store(config: &Config) -> SharedStore {
    tracing::debug!("Data directory: {}", config.data_dir.value.display());
    Arc::new(FileStore::new(config.data_dir.value.clone()))
}

fn open_menu(config: &Config) -> Result<(SharedStore, MenuRepository), Box<dyn std::error::Error>> {
    let store = open_store(config);
    let repo = MenuRepository::load(store.clone(), config.seed()?);
    tracing::debug!("Menu loaded from {}", repo.source());
    Ok((store, repo))
}
