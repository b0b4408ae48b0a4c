//! Bearer token payload decoding.
//!
//! The token is a JWT issued by the backend. The client reads the payload to
//! learn who signed in and does **not** verify the signature: the claims are
//! only good for cosmetic decisions such as hiding admin links. The backend
//! re-authorizes every request.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use thiserror::Error;

use ny_pizza_core::{Email, EmailError};

/// Errors that can occur when decoding a token payload.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token does not have three dot-separated segments.
    #[error("token is not a JWT")]
    Malformed,

    /// The payload segment is not base64url.
    #[error("token payload is not base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The payload is not the expected JSON object.
    #[error("token payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The email claim is not an email address.
    #[error("token email claim is invalid: {0}")]
    Email(#[from] EmailError),
}

/// Claims the client reads from the token payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Authenticated email.
    pub email: Email,
}

#[derive(Deserialize)]
struct RawClaims {
    email: String,
}

/// Decode the payload of `token` without verifying its signature.
///
/// # Errors
///
/// Returns a [`TokenError`] if the token is not a three-part JWT, the payload
/// cannot be decoded, or it lacks a valid `email` claim.
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(TokenError::Malformed);
    };

    // Some issuers keep base64 padding
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
    let raw: RawClaims = serde_json::from_slice(&bytes)?;

    Ok(TokenClaims {
        email: Email::parse(&raw.email)?,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    /// Build an unsigned token carrying `payload`.
    pub(crate) fn token_with_payload(payload: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("{header}.{body}.signature")
    }

    #[test]
    fn test_decode_email_claim() {
        let token = token_with_payload(&serde_json::json!({
            "email": "admin@example.com",
            "iat": 1_600_000_000,
            "exp": 1_600_003_600,
            "sub": "1"
        }));

        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.email.as_str(), "admin@example.com");
    }

    #[test]
    fn test_padded_payload() {
        let header = URL_SAFE_NO_PAD.encode(b"{}");
        let body = base64::engine::general_purpose::URL_SAFE.encode(br#"{"email":"a@b.com"}"#);
        let token = format!("{header}.{body}.sig");
        assert!(decode_claims(&token).is_ok());
    }

    #[test]
    fn test_rejects_malformed_tokens() {
        assert!(matches!(decode_claims("opaque"), Err(TokenError::Malformed)));
        assert!(matches!(decode_claims("a.b.c.d"), Err(TokenError::Malformed)));
        assert!(matches!(decode_claims("a.!!!.c"), Err(TokenError::Base64(_))));
    }

    #[test]
    fn test_rejects_missing_email() {
        let token = token_with_payload(&serde_json::json!({"sub": "1"}));
        assert!(matches!(decode_claims(&token), Err(TokenError::Json(_))));

        let token = token_with_payload(&serde_json::json!({"email": "nope"}));
        assert!(matches!(decode_claims(&token), Err(TokenError::Email(_))));
    }
}
