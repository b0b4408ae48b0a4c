//! Login form.

use secrecy::{ExposeSecret, SecretString};

use super::{Flash, required};
use crate::api::AuthApi;
use crate::stores::SessionStore;

const MISSING_FIELDS: &str = "Fill all fields!";
const REJECTED: &str = "Invalid Credentials";

/// Field values of the login form.
#[derive(Debug, Clone)]
pub struct LoginForm {
    /// Email as typed.
    pub email: String,
    /// Password as typed; cleared after a successful login.
    pub password: SecretString,
    /// Outcome of the last submit.
    pub flash: Option<Flash>,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new("", "")
    }
}

impl LoginForm {
    /// A form pre-filled with `email` and `password`.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
            flash: None,
        }
    }

    /// Log in with the typed credentials.
    ///
    /// Returns whether a user is now signed in. Blank fields fail locally;
    /// any backend failure shows the same message. The password field is
    /// cleared on success.
    pub async fn submit<A: AuthApi>(&mut self, session: &SessionStore<A>) -> bool {
        let fields = required(&self.email, "email")
            .and_then(|email| required(self.password.expose_secret(), "password").map(|_| email));
        let email = match fields {
            Ok(email) => email.to_string(),
            Err(_) => {
                self.flash = Some(Flash::danger(MISSING_FIELDS));
                return false;
            }
        };

        if session
            .login(&email, self.password.expose_secret())
            .await
        {
            self.password = SecretString::from(String::new());
            self.flash = None;
            true
        } else {
            self.flash = Some(Flash::danger(REJECTED));
            false
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use ny_pizza_core::Email;

    use super::*;
    use crate::stores::fake::{FakeBackend, REJECTED_PASSWORD, harness};

    fn session(backend: &Arc<FakeBackend>) -> SessionStore<FakeBackend> {
        let (bus, persistence, _) = harness();
        let admin = Email::parse("admin@example.com").unwrap();
        SessionStore::new(Arc::clone(backend), bus, persistence, admin)
    }

    #[tokio::test]
    async fn test_blank_fields_make_no_call() {
        let backend = Arc::new(FakeBackend::default());
        let session = session(&backend);
        let mut form = LoginForm::new("a@b.com", " ");

        assert!(!form.submit(&session).await);
        assert_eq!(form.flash, Some(Flash::danger(MISSING_FIELDS)));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_rejected_credentials() {
        let backend = Arc::new(FakeBackend::default());
        let session = session(&backend);
        let mut form = LoginForm::new("a@b.com", REJECTED_PASSWORD);

        assert!(!form.submit(&session).await);
        assert_eq!(form.flash, Some(Flash::danger(REJECTED)));
        assert!(session.current_user().is_none());
    }

    #[tokio::test]
    async fn test_success_clears_password() {
        let backend = Arc::new(FakeBackend::default());
        let session = session(&backend);
        let mut form = LoginForm::new("admin@example.com", "x");

        assert!(form.submit(&session).await);
        assert!(form.password.expose_secret().is_empty());
        assert!(session.current_user().unwrap().is_admin());
    }
}
