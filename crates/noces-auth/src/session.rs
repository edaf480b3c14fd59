use chrono::{DateTime, Utc};
use noces_core::identity::AuthAccount;
use serde::{Deserialize, Serialize};

use crate::claims::decode_claims;
use crate::error::AuthError;
use crate::firebase::FirebaseAuth;
use crate::token_store;

/// Sessions expiring within this many seconds are refreshed before use.
pub const REFRESH_BUFFER_SECS: i64 = 60;

/// A signed-in Firebase session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id_token: String,
    /// Absent for sessions built from a bare ID token (`NOCES_AUTH__TOKEN`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Build a session from a bare ID token, reading uid/email/expiry from
    /// its (unverified) claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Other` if the token cannot be decoded.
    pub fn from_id_token(id_token: &str) -> Result<Self, AuthError> {
        let claims = decode_claims(id_token)?;
        Ok(Self {
            id_token: id_token.to_string(),
            refresh_token: None,
            uid: claims.uid,
            email: claims.email,
            expires_at: claims.expires_at,
        })
    }

    #[must_use]
    pub fn to_account(&self) -> AuthAccount {
        AuthAccount {
            uid: self.uid.clone(),
            email: self.email.clone(),
        }
    }

    /// Check if the session is expired or expires within `buffer_secs`.
    #[must_use]
    pub fn is_near_expiry(&self, buffer_secs: i64) -> bool {
        self.expires_at <= Utc::now() + chrono::TimeDelta::seconds(buffer_secs)
    }
}

/// Load the stored session, refreshing it first when it is about to expire.
///
/// A refreshed session is written back to the store. Sessions without a
/// refresh token cannot be renewed and fail with `TokenExpired`.
///
/// # Errors
///
/// Returns `AuthError::NotAuthenticated` when nothing is stored,
/// `AuthError::TokenExpired` when an expired session cannot be refreshed, and
/// any error from the Secure Token API.
pub async fn resolve_session(auth: &FirebaseAuth) -> Result<Session, AuthError> {
    let session = token_store::load().ok_or(AuthError::NotAuthenticated)?;
    refresh_if_needed(auth, session).await
}

pub(crate) async fn refresh_if_needed(
    auth: &FirebaseAuth,
    session: Session,
) -> Result<Session, AuthError> {
    if !session.is_near_expiry(REFRESH_BUFFER_SECS) {
        return Ok(session);
    }
    let Some(refresh_token) = session.refresh_token.as_deref() else {
        return Err(AuthError::TokenExpired);
    };

    tracing::debug!(uid = %session.uid, "session near expiry; refreshing");
    let refreshed = auth.refresh(refresh_token).await?;
    if let Err(error) = token_store::store(&refreshed) {
        tracing::warn!(%error, "failed to persist refreshed session");
    }
    Ok(refreshed)
}
