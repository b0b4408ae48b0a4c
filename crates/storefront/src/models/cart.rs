//! The cart mapping.
//!
//! A cart maps product identifiers to entries. Keys are unique; ordering is
//! irrelevant to the domain, but a `BTreeMap` keeps serialization and display
//! stable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use ny_pizza_core::{Price, ProductId};

use super::Product;

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    /// Key of this entry in the cart mapping.
    pub id: ProductId,
    /// Product snapshot taken when the entry was created.
    pub product: Product,
    /// Always at least 1 while the entry exists.
    pub quantity: u32,
}

impl CartEntry {
    /// Price of the whole line, or `None` if it does not fit a price.
    #[must_use]
    pub fn line_total(&self) -> Option<Price> {
        self.product.price.checked_times(self.quantity)
    }
}

/// Mapping from product identifier to cart entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart(BTreeMap<ProductId, CartEntry>);

impl Cart {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the product with quantity 1, or bump the existing entry.
    ///
    /// Returns the new quantity.
    pub fn add(&mut self, product: &Product) -> u32 {
        let entry = self
            .0
            .entry(product.id.clone())
            .and_modify(|entry| entry.quantity = entry.quantity.saturating_add(1))
            .or_insert_with(|| CartEntry {
                id: product.id.clone(),
                product: product.clone(),
                quantity: 1,
            });
        entry.quantity
    }

    /// Decrement the entry, dropping it when it reaches zero.
    ///
    /// Returns the remaining quantity, or `None` if the id was not in the cart.
    pub fn remove_one(&mut self, id: &ProductId) -> Option<u32> {
        let entry = self.0.get_mut(id)?;
        entry.quantity = entry.quantity.saturating_sub(1);
        let remaining = entry.quantity;
        if remaining == 0 {
            self.0.remove(id);
        }
        Some(remaining)
    }

    /// Remove up to `quantity` units of `id`, dropping the entry at zero.
    ///
    /// Returns the number of units actually removed.
    pub fn take(&mut self, id: &ProductId, quantity: u32) -> u32 {
        let Some(entry) = self.0.get_mut(id) else {
            return 0;
        };
        let taken = entry.quantity.min(quantity);
        entry.quantity -= taken;
        if entry.quantity == 0 {
            self.0.remove(id);
        }
        taken
    }

    /// Insert a whole entry as-is, replacing any entry under the same id.
    ///
    /// Entries with a zero quantity or whose id does not match their product
    /// are refused; returns whether the entry was kept.
    pub fn insert_entry(&mut self, entry: CartEntry) -> bool {
        if entry.quantity == 0 || entry.id != entry.product.id {
            return false;
        }
        self.0.insert(entry.id.clone(), entry);
        true
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Look up one entry.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartEntry> {
        self.0.get(id)
    }

    /// Iterate entries in key order.
    pub fn entries(&self) -> impl Iterator<Item = &CartEntry> {
        self.0.values()
    }

    /// Whether the cart has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value shown on the cart badge: the number of distinct products,
    /// not the sum of quantities.
    #[must_use]
    pub fn badge_count(&self) -> usize {
        self.0.len()
    }

    /// Sum of all quantities, saturating at `u32::MAX`.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.0
            .values()
            .fold(0, |total: u32, entry| total.saturating_add(entry.quantity))
    }

    /// Sum of all line totals, or `None` if the amount overflows.
    #[must_use]
    pub fn subtotal(&self) -> Option<Price> {
        self.0
            .values()
            .map(CartEntry::line_total)
            .try_fold(Price::ZERO, |total, line| total.checked_add(line?))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: &str, price: &str) -> Product {
        Product::new(ProductId::new(id), id.to_uppercase(), Price::parse(price).unwrap())
    }

    #[test]
    fn test_add_inserts_then_increments() {
        let mut cart = Cart::new();
        let pizza = product("pizza", "10");

        assert_eq!(cart.add(&pizza), 1);
        assert_eq!(cart.add(&pizza), 2);
        assert_eq!(cart.badge_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
    }

    #[test]
    fn test_badge_counts_distinct_keys() {
        let mut cart = Cart::new();
        cart.add(&product("a", "1"));
        cart.add(&product("a", "1"));
        cart.add(&product("b", "1"));
        assert_eq!(cart.badge_count(), 2);
    }

    #[test]
    fn test_add_then_remove_restores_prior_mapping() {
        let mut cart = Cart::new();
        cart.add(&product("a", "1"));
        let before = cart.clone();

        let b = product("b", "2");
        cart.add(&b);
        cart.remove_one(&b.id);
        assert_eq!(cart, before);

        let a = product("a", "1");
        cart.add(&a);
        cart.remove_one(&a.id);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart = Cart::new();
        assert_eq!(cart.remove_one(&ProductId::new("ghost")), None);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_subtotal() {
        let mut cart = Cart::new();
        cart.add(&product("a", "2.50"));
        cart.add(&product("a", "2.50"));
        cart.add(&product("b", "5"));
        assert_eq!(cart.subtotal().unwrap().to_string(), "$10.00");
    }

    #[test]
    fn test_totals_do_not_overflow() {
        let mut cart = Cart::new();
        let big = product("big", "79228162514264337593543950335");
        cart.add(&big);
        cart.add(&big);

        assert_eq!(cart.get(&big.id).unwrap().line_total(), None);
        assert_eq!(cart.subtotal(), None);

        let mut entry = cart.get(&big.id).unwrap().clone();
        entry.quantity = u32::MAX;
        cart.insert_entry(entry);
        cart.add(&product("small", "1"));
        assert_eq!(cart.total_quantity(), u32::MAX);
    }

    #[test]
    fn test_take_removes_many_units() {
        let mut cart = Cart::new();
        let pizza = product("pizza", "10");
        cart.add(&pizza);
        cart.add(&pizza);
        cart.add(&pizza);

        assert_eq!(cart.take(&pizza.id, 2), 2);
        assert_eq!(cart.get(&pizza.id).unwrap().quantity, 1);
        assert_eq!(cart.take(&pizza.id, u32::MAX), 1);
        assert!(cart.is_empty());
        assert_eq!(cart.take(&pizza.id, 1), 0);
    }

    #[test]
    fn test_insert_entry_refuses_invalid() {
        let mut cart = Cart::new();
        let pizza = product("pizza", "10");
        let entry = CartEntry {
            id: pizza.id.clone(),
            product: pizza.clone(),
            quantity: 0,
        };
        assert!(!cart.insert_entry(entry.clone()));
        assert!(!cart.insert_entry(CartEntry {
            id: ProductId::new("other"),
            quantity: 1,
            ..entry.clone()
        }));
        assert!(cart.insert_entry(CartEntry {
            quantity: 7,
            ..entry
        }));
        assert_eq!(cart.total_quantity(), 7);
    }

    #[test]
    fn test_serialized_as_object_keyed_by_id() {
        let mut cart = Cart::new();
        cart.add(&product("a", "1"));
        let value = serde_json::to_value(&cart).unwrap();
        assert_eq!(value["a"]["quantity"], 1);
        assert_eq!(value["a"]["product"]["name"], "A");

        let back: Cart = serde_json::from_value(value).unwrap();
        assert_eq!(back, cart);
    }
}
