//! Checkout: order summary, messaging hand-off, statistics.
//!
//! The summary is built from the cart as it is at call time. A special
//! request is disclosed with the fee that *may* apply; the fee is never
//! added to the subtotal.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::cart::Cart;
use crate::models::format_amount;
use crate::stats::StatsRecorder;

pub const DEFAULT_CURRENCY: &str = "FCFA";
pub const DEFAULT_SPECIAL_REQUEST_FEE: f64 = 500.0;

const MESSAGE_BASE_URL: &str = "https://wa.me/";

#[derive(Error, Debug, PartialEq)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutOptions {
    pub currency: String,
    pub special_request_fee: f64,
}

impl Default for CheckoutOptions {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            special_request_fee: DEFAULT_SPECIAL_REQUEST_FEE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLine {
    pub dish_id: u64,
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub line_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSummary {
    pub lines: Vec<OrderLine>,
    pub special_request: Option<String>,
    /// Disclosed alongside a special request; not part of `subtotal`.
    pub special_request_fee: f64,
    pub subtotal: f64,
    pub currency: String,
}

impl OrderSummary {
    pub fn from_cart(
        cart: &Cart,
        special_request: Option<&str>,
        options: &CheckoutOptions,
    ) -> Self {
        let lines = cart
            .lines()
            .iter()
            .map(|line| OrderLine {
                dish_id: line.dish.id,
                name: line.dish.name.clone(),
                quantity: line.quantity,
                unit_price: line.dish.price,
                line_total: line.line_total(),
            })
            .collect();

        let special_request = special_request
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Self {
            lines,
            special_request,
            special_request_fee: options.special_request_fee,
            subtotal: cart.total(),
            currency: options.currency.clone(),
        }
    }

    /// Messaging link carrying the URL-encoded summary. Non-digits in
    /// `phone` are dropped.
    pub fn message_link(&self, phone: &str) -> String {
        let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
        format!(
            "{}{}?text={}",
            MESSAGE_BASE_URL,
            digits,
            urlencoding::encode(&self.to_string())
        )
    }
}

impl fmt::Display for OrderSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bonjour, je souhaite commander :")?;
        writeln!(f)?;
        for line in &self.lines {
            writeln!(
                f,
                "- {} x {} : {} {}",
                line.quantity,
                line.name,
                format_amount(line.line_total),
                self.currency
            )?;
        }

        if let Some(request) = &self.special_request {
            writeln!(f)?;
            writeln!(f, "Demande spéciale : {}", request)?;
            writeln!(
                f,
                "(Des frais de {} {} peuvent s'appliquer)",
                format_amount(self.special_request_fee),
                self.currency
            )?;
        }

        writeln!(f)?;
        write!(
            f,
            "Sous-total : {} {}",
            format_amount(self.subtotal),
            self.currency
        )
    }
}

/// Completes an order: builds the summary, records statistics and empties
/// the cart.
pub fn checkout(
    cart: &mut Cart,
    stats: &mut StatsRecorder,
    special_request: Option<&str>,
    options: &CheckoutOptions,
) -> Result<OrderSummary, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let summary = OrderSummary::from_cart(cart, special_request, options);
    stats.record(cart.lines());
    cart.clear();

    tracing::info!(
        "Checked out {} item(s), subtotal {}",
        summary.lines.iter().map(|l| l.quantity).sum::<u32>(),
        format_amount(summary.subtotal)
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Catalog, Dish};
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn catalog() -> Catalog {
        Catalog::new(
            vec![],
            vec![
                Dish::new(1, "Plats", "Poulet", 2500.0),
                Dish::new(2, "Boissons", "Bissap", 500.0),
            ],
        )
    }

    #[test]
    fn test_summary_text() {
        let catalog = catalog();
        let mut cart = Cart::load(Arc::new(MemoryStore::new()));
        cart.add(&catalog, 1);
        cart.add(&catalog, 1);
        cart.add(&catalog, 2);

        let summary = OrderSummary::from_cart(&cart, None, &CheckoutOptions::default());
        assert_eq!(
            summary.to_string(),
            "Bonjour, je souhaite commander :\n\n\
             - 2 x Poulet : 5000 FCFA\n\
             - 1 x Bissap : 500 FCFA\n\n\
             Sous-total : 5500 FCFA"
        );
    }

    #[test]
    fn test_special_request_fee_not_added() {
        let catalog = catalog();
        let mut cart = Cart::load(Arc::new(MemoryStore::new()));
        cart.add(&catalog, 1);

        let summary =
            OrderSummary::from_cart(&cart, Some(" sans piment "), &CheckoutOptions::default());
        assert_eq!(summary.special_request.as_deref(), Some("sans piment"));
        assert_eq!(summary.subtotal, 2500.0);

        let text = summary.to_string();
        assert!(text.contains("Demande spéciale : sans piment"));
        assert!(text.contains("Des frais de 500 FCFA peuvent s'appliquer"));
        assert!(text.ends_with("Sous-total : 2500 FCFA"));
    }

    #[test]
    fn test_blank_special_request_ignored() {
        let catalog = catalog();
        let mut cart = Cart::load(Arc::new(MemoryStore::new()));
        cart.add(&catalog, 2);
        let summary = OrderSummary::from_cart(&cart, Some("   "), &CheckoutOptions::default());
        assert_eq!(summary.special_request, None);
    }

    #[test]
    fn test_message_link_encodes_summary() {
        let catalog = catalog();
        let mut cart = Cart::load(Arc::new(MemoryStore::new()));
        cart.add(&catalog, 2);

        let summary = OrderSummary::from_cart(&cart, None, &CheckoutOptions::default());
        let link = summary.message_link("+221 77 000 00 00");
        assert!(link.starts_with("https://wa.me/221770000000?text=Bonjour%2C%20je"));
        assert!(!link.contains(' '));
        assert!(!link.contains('\n'));
    }

    #[test]
    fn test_checkout_records_stats_and_clears_cart() {
        let catalog = catalog();
        let store = Arc::new(MemoryStore::new());
        let mut cart = Cart::load(store.clone());
        let mut stats = StatsRecorder::load(store.clone());
        cart.add(&catalog, 1);
        cart.add(&catalog, 1);
        cart.add(&catalog, 2);

        let summary = checkout(&mut cart, &mut stats, None, &CheckoutOptions::default()).unwrap();

        assert_eq!(summary.subtotal, 5500.0);
        assert!(cart.is_empty());
        assert_eq!(stats.stats().dish_count(1), 2);
        assert_eq!(stats.stats().category_count("Boissons"), 1);
        assert!(Cart::load(store).is_empty());
    }

    #[test]
    fn test_checkout_empty_cart() {
        let store = Arc::new(MemoryStore::new());
        let mut cart = Cart::load(store.clone());
        let mut stats = StatsRecorder::load(store);
        assert_eq!(
            checkout(&mut cart, &mut stats, None, &CheckoutOptions::default()),
            Err(CheckoutError::EmptyCart)
        );
        assert!(stats.stats().dishes.is_empty());
    }
}
