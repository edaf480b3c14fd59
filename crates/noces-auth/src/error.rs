use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not authenticated: run `noces auth login`")]
    NotAuthenticated,

    #[error("session expired: run `noces auth login` again")]
    TokenExpired,

    #[error("account {0} is disabled")]
    AccountDisabled(String),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("Firebase Auth is not configured (set NOCES_FIREBASE__API_KEY)")]
    NotConfigured,

    #[error("Firebase API error ({status}): {message}")]
    FirebaseApi { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token store error: {0}")]
    TokenStoreError(String),

    #[error("{0}")]
    Other(String),
}
