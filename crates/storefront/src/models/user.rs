//! User domain types.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use ny_pizza_core::{AccessLevel, Email};

/// Opaque bearer token returned by the login endpoint.
///
/// Held as a secret so it never shows up in `Debug` output or logs. It is
/// serialized in clear text only for durable storage.
#[derive(Clone)]
pub struct BearerToken(SecretString);

impl BearerToken {
    /// Wrap a raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// The raw token, for `Authorization` headers.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

impl PartialEq for BearerToken {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for BearerToken {}

impl Serialize for BearerToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.expose())
    }
}

impl<'de> Deserialize<'de> for BearerToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// The signed-in user.
///
/// Created on successful login, destroyed on logout, rehydrated from the
/// `user` storage key on startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Email taken from the token's payload.
    pub email: Email,
    /// Bearer token for authenticated calls.
    pub token: BearerToken,
    /// Derived once at login.
    pub access_level: AccessLevel,
}

impl User {
    /// Whether admin-only surfaces should be shown to this user.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.access_level.is_admin()
    }
}
