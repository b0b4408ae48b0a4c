//! Capability checks for protected views.
//!
//! Decisions are computed from the state passed in on each publication and
//! never cached, so a logout immediately revokes access.

use crate::bus::Subscriber;
use crate::models::User;
use crate::nav::Route;
use crate::state::AppState;

/// Outcome of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access<'a> {
    /// The view may render for this user.
    Granted(&'a User),
    /// Navigate here instead.
    Redirect(Route),
}

impl Access<'_> {
    /// Whether the view may render.
    #[must_use]
    pub const fn is_granted(&self) -> bool {
        matches!(self, Self::Granted(_))
    }
}

/// Capability checks.
pub struct AuthGuard;

impl AuthGuard {
    /// Admin-only surfaces: requires a user with access level below 1.
    /// Everyone else goes to [`Route::Home`].
    #[must_use]
    pub fn admin(state: &AppState) -> Access<'_> {
        match &state.user {
            Some(user) if user.is_admin() => Access::Granted(user),
            _ => Access::Redirect(Route::Home),
        }
    }

    /// Signed-in surfaces such as checkout. Guests go to [`Route::Login`].
    #[must_use]
    pub fn signed_in(state: &AppState) -> Access<'_> {
        state
            .user
            .as_ref()
            .map_or(Access::Redirect(Route::Login), Access::Granted)
    }
}

/// Subscriber adapter that only forwards state to `view` while the current
/// user is an admin, and calls `redirect` otherwise.
pub struct AdminOnly<V, R> {
    view: V,
    redirect: R,
}

impl<V, R> AdminOnly<V, R>
where
    V: Subscriber,
    R: Fn(Route) + Send + Sync,
{
    /// Wrap a view.
    pub const fn new(view: V, redirect: R) -> Self {
        Self { view, redirect }
    }
}

impl<V, R> Subscriber for AdminOnly<V, R>
where
    V: Subscriber,
    R: Fn(Route) + Send + Sync,
{
    fn on_state(&self, state: &AppState) {
        match AuthGuard::admin(state) {
            Access::Granted(_) => self.view.on_state(state),
            Access::Redirect(route) => (self.redirect)(route),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use ny_pizza_core::{AccessLevel, Email};

    use super::*;
    use crate::bus::StateBus;
    use crate::models::BearerToken;

    fn state_with(level: Option<AccessLevel>) -> AppState {
        AppState {
            user: level.map(|access_level| User {
                email: Email::parse("a@b.com").unwrap(),
                token: BearerToken::new("t"),
                access_level,
            }),
            ..AppState::default()
        }
    }

    #[test]
    fn test_admin_guard() {
        assert!(AuthGuard::admin(&state_with(Some(AccessLevel::Admin))).is_granted());
        assert_eq!(
            AuthGuard::admin(&state_with(Some(AccessLevel::Regular))),
            Access::Redirect(Route::Home)
        );
        assert_eq!(
            AuthGuard::admin(&state_with(None)),
            Access::Redirect(Route::Home)
        );
    }

    #[test]
    fn test_signed_in_guard() {
        assert!(AuthGuard::signed_in(&state_with(Some(AccessLevel::Regular))).is_granted());
        assert_eq!(
            AuthGuard::signed_in(&state_with(None)),
            Access::Redirect(Route::Login)
        );
    }

    #[test]
    fn test_admin_only_reevaluates_on_every_publication() {
        let bus = StateBus::new(state_with(Some(AccessLevel::Admin)));
        let log = Arc::new(Mutex::new(Vec::new()));

        let rendered = Arc::clone(&log);
        let redirected = Arc::clone(&log);
        bus.subscribe(AdminOnly::new(
            move |_: &AppState| rendered.lock().unwrap().push("render".to_string()),
            move |route: Route| redirected.lock().unwrap().push(route.to_string()),
        ));

        bus.update(|state| state.user = None);

        assert_eq!(*log.lock().unwrap(), vec!["render", "/"]);
    }
}
