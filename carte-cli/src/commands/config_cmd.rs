use clap::{Args, Subcommand};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use super::OutputFormat;
use crate::config::Config;
use carte_core::format_amount;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init,
}

const DEFAULT_CONFIG: &str = r#"# carte configuration

# Directory holding the menu, cart, favorites and order stats
# data_dir: ~/.local/share/carte

# Admin passcode (default: 1234)
# admin_passcode: "1234"

# Seed menu used until the menu is edited (default: bundled menu)
# seed_file: menu.json

checkout:
  # Restaurant phone number receiving orders
  # phone: "+221770000000"
  currency: FCFA
  special_request_fee: 500
"#;

impl ConfigCommand {
    pub fn run(
        &self,
        config: &Config,
        cli_config_path: Option<PathBuf>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        println!("data_dir: {}", config.data_dir.value.display());
                        println!("  source: {}", config.data_dir.source);
                        println!();

                        println!("admin_passcode: ****");
                        println!("  source: {}", config.admin_passcode.source);
                        println!();

                        match &config.seed_file {
                            Some(seed) => {
                                println!("seed_file: {}", seed.value.display());
                                println!("  source: {}", seed.source);
                            }
                            None => println!("seed_file: (bundled menu)"),
                        }
                        println!();

                        println!("checkout:");
                        println!(
                            "  phone: {}",
                            config.checkout.phone.as_deref().unwrap_or("(not set)")
                        );
                        println!("  currency: {}", config.checkout.currency);
                        println!(
                            "  special_request_fee: {}",
                            format_amount(config.checkout.special_request_fee)
                        );
                    }
                }
                Ok(())
            }

            ConfigSubcommand::Init => {
                let config_path = cli_config_path.unwrap_or_else(Config::default_config_path);

                // Check if config already exists
                if config_path.exists() {
                    println!("Config file already exists: {}", config_path.display());
                    println!("Use 'carte config show' to view current configuration.");
                    return Ok(());
                }

                // Create parent directory
                if let Some(parent) = config_path.parent() {
                    fs::create_dir_all(parent)?;
                }

                let mut file = fs::File::create(&config_path)?;
                file.write_all(DEFAULT_CONFIG.as_bytes())?;

                println!("Created config file: {}", config_path.display());
                println!("\nEdit this file to customize your settings.");
                Ok(())
            }
        }
    }
}
