//! Routes and the navigation bar view model.

use std::fmt;
use std::str::FromStr;

use crate::state::AppState;

/// Client-side routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Landing page, `/`.
    Home,
    /// Catalog listing.
    Products,
    /// Sign-in form.
    Login,
    /// Cart contents and checkout.
    Cart,
    /// Product creation form (admin only).
    AddProduct,
}

impl Route {
    /// All routes, in navigation order.
    pub const ALL: [Self; 5] = [
        Self::Home,
        Self::Products,
        Self::Login,
        Self::Cart,
        Self::AddProduct,
    ];

    /// URL path of the route.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Products => "/products",
            Self::Login => "/login",
            Self::Cart => "/cart",
            Self::AddProduct => "/add-product",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Error for a path that matches no route.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no route for path {0:?}")]
pub struct UnknownRoute(pub String);

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Tolerate a trailing slash, except on the root itself
        let path = match s.strip_suffix('/') {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => s,
        };
        Self::ALL
            .into_iter()
            .find(|route| route.path() == path)
            .ok_or_else(|| UnknownRoute(s.to_string()))
    }
}

/// Navigation bar derived from the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavBar {
    /// Distinct products in the cart.
    pub cart_badge: usize,
    /// Whether the Add Product link is shown.
    pub show_add_product: bool,
    /// Whether a user is signed in (Logout shown instead of Login).
    pub logged_in: bool,
}

impl NavBar {
    /// Routes linked from the bar, in display order.
    #[must_use]
    pub fn links(&self) -> Vec<Route> {
        let mut links = vec![Route::Products];
        if self.show_add_product {
            links.push(Route::AddProduct);
        }
        links.push(Route::Cart);
        if !self.logged_in {
            links.push(Route::Login);
        }
        links
    }
}

impl From<&AppState> for NavBar {
    fn from(state: &AppState) -> Self {
        Self {
            cart_badge: state.cart.badge_count(),
            show_add_product: state.is_admin(),
            logged_in: state.user.is_some(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ny_pizza_core::{AccessLevel, Email, Price, ProductId};

    use super::*;
    use crate::models::{BearerToken, Product, User};

    fn user(level: AccessLevel) -> User {
        User {
            email: Email::parse("a@b.com").unwrap(),
            token: BearerToken::new("t"),
            access_level: level,
        }
    }

    #[test]
    fn test_route_paths_round_trip() {
        for route in Route::ALL {
            assert_eq!(route.path().parse::<Route>().unwrap(), route);
        }
        assert_eq!("/cart/".parse::<Route>().unwrap(), Route::Cart);
        assert!("/admin".parse::<Route>().is_err());
    }

    #[test]
    fn test_guest_nav() {
        let nav = NavBar::from(&AppState::default());
        assert_eq!(nav.cart_badge, 0);
        assert_eq!(nav.links(), vec![Route::Products, Route::Cart, Route::Login]);
    }

    #[test]
    fn test_admin_nav() {
        let mut state = AppState {
            user: Some(user(AccessLevel::Admin)),
            ..AppState::default()
        };
        let pizza = Product::new(ProductId::new("p1"), "Pizza", Price::parse("10").unwrap());
        state.cart.add(&pizza);
        state.cart.add(&pizza);

        let nav = NavBar::from(&state);
        assert_eq!(nav.cart_badge, 1);
        assert_eq!(
            nav.links(),
            vec![Route::Products, Route::AddProduct, Route::Cart]
        );
    }

    #[test]
    fn test_regular_user_has_no_add_product() {
        let state = AppState {
            user: Some(user(AccessLevel::Regular)),
            ..AppState::default()
        };
        assert!(!NavBar::from(&state).show_add_product);
    }
}
