//! Cart store: cart mutations and checkout.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use ny_pizza_core::ProductId;

use super::CheckoutError;
use crate::api::{Order, OrderService, Receipt};
use crate::bus::StateBus;
use crate::error::add_breadcrumb;
use crate::models::{Cart, Product};
use crate::persistence::Persistence;

/// Owns the `cart` slice of state.
pub struct CartStore<O> {
    orders: Arc<O>,
    bus: StateBus,
    persistence: Persistence,
}

impl<O> Clone for CartStore<O> {
    fn clone(&self) -> Self {
        Self {
            orders: Arc::clone(&self.orders),
            bus: self.bus.clone(),
            persistence: self.persistence.clone(),
        }
    }
}

impl<O: OrderService> CartStore<O> {
    /// Create a cart store.
    #[must_use]
    pub const fn new(orders: Arc<O>, bus: StateBus, persistence: Persistence) -> Self {
        Self {
            orders,
            bus,
            persistence,
        }
    }

    /// Add one unit of `product`. Returns the new quantity.
    pub fn add_to_cart(&self, product: &Product) -> u32 {
        let quantity = self.bus.update(|state| {
            let quantity = state.cart.add(product);
            self.persistence.persist_cart(&state.cart);
            quantity
        });
        add_breadcrumb(
            "cart",
            "Added to cart",
            Some(&[("product_id", product.id.as_str())]),
        );
        quantity
    }

    /// Remove one unit of `id`, dropping the entry at zero.
    ///
    /// Returns the remaining quantity, or `None` (and publishes nothing) if
    /// the id was not in the cart.
    pub fn remove_from_cart(&self, id: &ProductId) -> Option<u32> {
        let mut remaining = None;
        self.bus.update_if(|state| {
            remaining = state.cart.remove_one(id);
            if remaining.is_some() {
                self.persistence.persist_cart(&state.cart);
            }
            remaining.is_some()
        });
        if remaining.is_some() {
            add_breadcrumb("cart", "Removed from cart", Some(&[("product_id", id.as_str())]));
        }
        remaining
    }

    /// Empty the cart.
    pub fn clear_cart(&self) {
        self.bus.update(|state| {
            state.cart.clear();
            self.persistence.persist_cart(&state.cart);
        });
    }

    /// Submit the cart to the order service.
    ///
    /// The ordered units are removed from the cart only once the service
    /// confirms. Items added while the order was in flight stay in the cart.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::NotLoggedIn`, `CheckoutError::EmptyCart` or
    /// `CheckoutError::TotalOverflow` without calling the service, and
    /// `CheckoutError::Order` if the service fails. The cart is unchanged in
    /// every error case.
    #[instrument(skip(self))]
    pub async fn checkout(&self) -> Result<Receipt, CheckoutError> {
        let state = self.bus.snapshot();
        let user = state.user.as_ref().ok_or(CheckoutError::NotLoggedIn)?;
        if state.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let order =
            Order::from_cart(user.email.clone(), &state.cart).ok_or(CheckoutError::TotalOverflow)?;
        add_breadcrumb("checkout", "Order submitted", Some(&[("order_id", order.id.as_str())]));

        let receipt = match self.orders.submit(&order, &user.token).await {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!(order_id = %order.id, error = %e, "checkout failed");
                return Err(e.into());
            }
        };

        self.bus.update(|state| {
            settle(&mut state.cart, &order);
            self.persistence.persist_cart(&state.cart);
        });

        info!(
            order_id = %receipt.order_id,
            items = receipt.item_count,
            total = %receipt.total,
            "order placed"
        );
        Ok(receipt)
    }

    /// The current cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.bus.snapshot().cart.clone()
    }
}

/// Remove the units of `order` from `cart`.
fn settle(cart: &mut Cart, order: &Order) {
    for item in &order.items {
        cart.take(&item.product_id, item.quantity);
    }
}
