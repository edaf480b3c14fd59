//! # noces-auth
//!
//! Firebase Auth for the Noces CLI.
//!
//! Signs planners and portal clients in through the Identity Toolkit REST API,
//! refreshes sessions through the Secure Token API, verifies tokens with
//! `accounts:lookup`, and stores sessions in the OS keychain with env and
//! file fallbacks.

pub mod claims;
pub mod error;
pub mod firebase;
pub mod session;
pub mod token_store;

pub use claims::{TokenClaims, decode_claims};
pub use error::AuthError;
pub use firebase::{FirebaseAccount, FirebaseAuth};
pub use session::{Session, resolve_session};

/// Sign in with email and password and persist the session.
///
/// # Errors
///
/// Returns the sign-in error, or `AuthError::TokenStoreError` if the session
/// cannot be stored.
pub async fn login(auth: &FirebaseAuth, email: &str, password: &str) -> Result<Session, AuthError> {
    let session = auth.sign_in_with_password(email, password).await?;
    token_store::store(&session)?;
    tracing::debug!(uid = %session.uid, "signed in");
    Ok(session)
}

/// Clear stored credentials.
///
/// # Errors
///
/// Returns `AuthError::TokenStoreError` if the credentials file cannot be removed.
pub fn logout() -> Result<(), AuthError> {
    token_store::delete()
}
