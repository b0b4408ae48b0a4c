//! Terminal rendering.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::sync::{Mutex, PoisonError};

use ny_pizza_core::Price;
use ny_pizza_storefront::api::Receipt;
use ny_pizza_storefront::forms::{Flash, FlashLevel};
use ny_pizza_storefront::models::{Cart, Product};
use ny_pizza_storefront::{AppState, CatalogStatus, NavBar, Subscriber};

/// Subscriber that reports navigation and catalog changes as they happen.
#[derive(Default)]
pub struct Terminal {
    last: Mutex<Option<(NavBar, CatalogStatus)>>,
}

impl Subscriber for Terminal {
    fn on_state(&self, state: &AppState) {
        let current = (NavBar::from(state), state.catalog.clone());
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some((nav, catalog)) = last.as_ref() {
            if *nav != current.0 {
                print_nav(&current.0);
            }
            if *catalog != current.1
                && let CatalogStatus::Error(message) = &current.1
            {
                eprintln!("! {message} (run `pizza reload` to retry)");
            }
        }
        *last = Some(current);
    }
}

fn print_nav(nav: &NavBar) {
    let links: Vec<String> = nav
        .links()
        .into_iter()
        .map(|route| route.path().to_string())
        .collect();
    let session = if nav.logged_in { "signed in" } else { "guest" };
    println!("[{session}] cart: {} | {}", nav.cart_badge, links.join(" "));
}

pub fn products(products: &[Product]) {
    if products.is_empty() {
        println!("No products.");
        return;
    }
    for product in products {
        let stock = if product.stock > 0 {
            format!("{} in stock", product.stock)
        } else {
            "out of stock".to_string()
        };
        println!(
            "{:<16} {:<28} {:>10}  {stock}",
            product.id, product.name, product.price
        );
        if !product.short_desc.is_empty() {
            println!("{:<16} {}", "", product.short_desc);
        }
    }
}

pub fn cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }
    for entry in cart.entries() {
        println!(
            "{:<16} {:<28} x{:<4} {:>10}",
            entry.id,
            entry.product.name,
            entry.quantity,
            amount(entry.line_total())
        );
    }
    println!(
        "{} products, {} items, subtotal {}",
        cart.badge_count(),
        cart.total_quantity(),
        amount(cart.subtotal())
    );
}

fn amount(price: Option<Price>) -> String {
    price.map_or_else(|| "too large".to_string(), |price| price.to_string())
}

pub fn receipt(receipt: &Receipt) {
    println!(
        "Order {} placed: {} items, {} ({})",
        receipt.order_id,
        receipt.item_count,
        receipt.total,
        receipt.placed_at.format("%Y-%m-%d %H:%M UTC")
    );
}

pub fn flash(flash: &Flash) {
    match flash.level {
        FlashLevel::Success => println!("{}", flash.message),
        FlashLevel::Danger => eprintln!("! {}", flash.message),
    }
}

pub fn message(text: &str) {
    println!("{text}");
}

pub fn error(err: &dyn std::error::Error) {
    eprintln!("error: {err}");
}
