use clap::Args;

use super::OutputFormat;
use crate::config::Config;
use carte_core::{checkout, Cart, StatsRecorder};

#[derive(Args)]
pub struct CheckoutCommand {
    /// Special request for the kitchen (a fee may apply)
    #[arg(long, short)]
    note: Option<String>,

    /// Restaurant phone number, overriding the configured one
    #[arg(long)]
    phone: Option<String>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl CheckoutCommand {
    pub fn run(
        &self,
        cart: &mut Cart,
        stats: &mut StatsRecorder,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let options = config.checkout.options();
        let summary = checkout(cart, stats, self.note.as_deref(), &options)?;
        let link = self
            .phone
            .as_deref()
            .or(config.checkout.phone.as_deref())
            .map(|phone| summary.message_link(phone));

        match self.format {
            OutputFormat::Json => {
                let mut value = serde_json::to_value(&summary)?;
                if let (Some(link), Some(object)) = (&link, value.as_object_mut()) {
                    object.insert("link".to_string(), link.clone().into());
                }
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
            OutputFormat::Text => {
                println!("{}", summary);
                println!();
                match link {
                    Some(link) => println!("Send your order: {}", link),
                    None => println!(
                        "No restaurant phone configured; set checkout.phone or CARTE_CHECKOUT_PHONE to get a message link."
                    ),
                }
            }
        }

        Ok(())
    }
}
