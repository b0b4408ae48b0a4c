//! Session store: login and logout.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use ny_pizza_core::{AccessLevel, Email};

use super::AuthError;
use crate::api::{AuthApi, Credentials, decode_claims};
use crate::bus::{Generation, StateBus};
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::models::{BearerToken, User};
use crate::persistence::Persistence;

/// Owns the `user` slice of state.
pub struct SessionStore<A> {
    api: Arc<A>,
    bus: StateBus,
    persistence: Persistence,
    admin_email: Email,
    generation: Arc<Generation>,
}

impl<A> Clone for SessionStore<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            bus: self.bus.clone(),
            persistence: self.persistence.clone(),
            admin_email: self.admin_email.clone(),
            generation: Arc::clone(&self.generation),
        }
    }
}

impl<A: AuthApi> SessionStore<A> {
    /// Create a session store.
    ///
    /// `admin_email` is the address granted [`AccessLevel::Admin`].
    #[must_use]
    pub fn new(api: Arc<A>, bus: StateBus, persistence: Persistence, admin_email: Email) -> Self {
        Self {
            api,
            bus,
            persistence,
            admin_email,
            generation: Arc::new(Generation::default()),
        }
    }

    /// Log in, collapsing every failure into `false`.
    ///
    /// State is untouched unless this returns `true`.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        match self.try_login(email, password).await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "login failed");
                false
            }
        }
    }

    /// Log in and report why it failed.
    ///
    /// The email and access level come from the token payload, not from the
    /// typed email. The signature is not checked, so the result only drives
    /// cosmetic UI gating.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Failed` for network errors and non-200 answers,
    /// `AuthError::InvalidToken` when the payload has no usable email, and
    /// `AuthError::Superseded` when a newer login or a logout happened while
    /// the request was in flight.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn try_login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let ticket = self.generation.begin();
        let credentials = Credentials::new(email, password);

        let response = self.api.login(&credentials).await?;
        let claims = decode_claims(&response.access_token)?;

        let access_level = AccessLevel::for_email(&claims.email, &self.admin_email);
        let user = User {
            email: claims.email,
            token: BearerToken::new(response.access_token),
            access_level,
        };

        let applied = self.bus.update_if(|state| {
            if !self.generation.is_current(ticket) {
                return false;
            }
            self.persistence.persist_user(Some(&user));
            state.user = Some(user.clone());
            true
        });

        if !applied {
            debug!("discarding stale login response");
            return Err(AuthError::Superseded);
        }

        set_sentry_user(user.email.as_str());
        info!(access_level = user.access_level.as_u8(), "user logged in");
        Ok(user)
    }

    /// Clear the user from memory and storage. Safe to call when logged out.
    ///
    /// Any login still in flight is discarded when it completes.
    pub fn logout(&self) {
        let was_logged_in = self.bus.update_if(|state| {
            self.generation.invalidate();
            self.persistence.persist_user(None);
            state.user.take().is_some()
        });

        clear_sentry_user();
        if was_logged_in {
            info!("user logged out");
        }
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.bus.snapshot().user.clone()
    }
}
