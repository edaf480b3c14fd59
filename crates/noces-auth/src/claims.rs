//! Unverified JWT payload decoding.
//!
//! Firebase ID tokens are verified server-side through `accounts:lookup`
//! ([`crate::firebase::FirebaseAuth::lookup`]). Decoding here only reads the
//! payload for quick expiry checks and display; it never trusts the token.

use base64::Engine;
use chrono::{DateTime, Utc};
use noces_core::identity::AuthAccount;
use serde::Deserialize;

use crate::error::AuthError;

/// Claims of a Firebase ID token that Noces cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Firebase uid (`user_id`, falling back to `sub`).
    pub uid: String,
    pub email: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl TokenClaims {
    #[must_use]
    pub fn to_account(&self) -> AuthAccount {
        AuthAccount {
            uid: self.uid.clone(),
            email: self.email.clone(),
        }
    }

    /// Check if the token is expired or expires within `buffer_secs`.
    #[must_use]
    pub fn is_near_expiry(&self, buffer_secs: i64) -> bool {
        self.expires_at <= Utc::now() + chrono::TimeDelta::seconds(buffer_secs)
    }
}

#[derive(Deserialize)]
struct RawClaims {
    user_id: Option<String>,
    sub: Option<String>,
    email: Option<String>,
    exp: Option<i64>,
}

/// Decode the payload of `jwt` without checking its signature.
///
/// # Errors
///
/// Returns `AuthError::Other` if the token is not a three-part JWT, the
/// payload is not base64url JSON, or `exp` / the uid are missing.
pub fn decode_claims(jwt: &str) -> Result<TokenClaims, AuthError> {
    let parts: Vec<&str> = jwt.split('.').collect();
    if parts.len() != 3 {
        return Err(AuthError::Other("invalid JWT format".into()));
    }
    let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(parts[1].trim_end_matches('='))
        .map_err(|e| AuthError::Other(format!("base64 decode failed: {e}")))?;
    let raw: RawClaims = serde_json::from_slice(&payload)
        .map_err(|e| AuthError::Other(format!("JSON parse failed: {e}")))?;

    let uid = raw
        .user_id
        .or(raw.sub)
        .filter(|uid| !uid.is_empty())
        .ok_or_else(|| AuthError::Other("missing user_id/sub claim".into()))?;
    let exp = raw
        .exp
        .ok_or_else(|| AuthError::Other("missing exp claim".into()))?;
    let expires_at = DateTime::from_timestamp(exp, 0)
        .ok_or_else(|| AuthError::Other("invalid exp timestamp".into()))?;

    Ok(TokenClaims {
        uid,
        email: raw.email,
        expires_at,
    })
}
