//! Coarse access levels derived client-side at login.
//!
//! The numeric encoding is part of the persisted user record: `0` is an
//! administrator, `1` a regular shopper. Lower is more privileged.

use serde::{Deserialize, Serialize};

use crate::Email;

/// Error for an out-of-range persisted access level.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unknown access level {0}")]
pub struct AccessLevelError(pub u8);

/// Access level of a signed-in user.
///
/// Only used for cosmetic gating of admin surfaces. The backend must
/// authorize every request on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AccessLevel {
    /// May add products.
    Admin = 0,
    /// Browses and buys.
    Regular = 1,
}

impl AccessLevel {
    /// Derive the level by comparing the authenticated email with the
    /// configured administrator address.
    #[must_use]
    pub fn for_email(email: &Email, admin_email: &Email) -> Self {
        if email == admin_email {
            Self::Admin
        } else {
            Self::Regular
        }
    }

    /// Numeric encoding (`0` admin, `1` regular).
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether this level unlocks admin-only surfaces (`level < 1`).
    #[must_use]
    pub const fn is_admin(self) -> bool {
        self.as_u8() < 1
    }
}

impl TryFrom<u8> for AccessLevel {
    type Error = AccessLevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Admin),
            1 => Ok(Self::Regular),
            other => Err(AccessLevelError(other)),
        }
    }
}

impl From<AccessLevel> for u8 {
    fn from(level: AccessLevel) -> Self {
        level.as_u8()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_for_email() {
        let admin = Email::parse("admin@example.com").unwrap();
        let shopper = Email::parse("a@b.com").unwrap();

        assert_eq!(AccessLevel::for_email(&admin, &admin), AccessLevel::Admin);
        assert_eq!(AccessLevel::for_email(&shopper, &admin), AccessLevel::Regular);
    }

    #[test]
    fn test_numeric_encoding() {
        assert_eq!(serde_json::to_string(&AccessLevel::Admin).unwrap(), "0");
        assert_eq!(serde_json::to_string(&AccessLevel::Regular).unwrap(), "1");
        assert_eq!(
            serde_json::from_str::<AccessLevel>("1").unwrap(),
            AccessLevel::Regular
        );
        assert!(serde_json::from_str::<AccessLevel>("7").is_err());
    }

    #[test]
    fn test_is_admin() {
        assert!(AccessLevel::Admin.is_admin());
        assert!(!AccessLevel::Regular.is_admin());
    }
}
