//! Integration error types.

use thiserror::Error;

/// Errors raised by the DocuSign, Qonto and Cloudinary clients.
#[derive(Debug, Error)]
pub enum IntegrationError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the API.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The API returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// Failed to parse an API response.
    #[error("parse error: {0}")]
    Parse(String),

    /// No usable credentials for the integration.
    #[error("{integration} is not configured: {hint}")]
    NotConfigured {
        integration: &'static str,
        hint: &'static str,
    },

    /// Token exchange or signing failed.
    #[error("{integration} authentication failed: {message}")]
    Auth {
        integration: &'static str,
        message: String,
    },

    #[error(transparent)]
    Core(#[from] noces_core::errors::CoreError),
}

/// Reasons a Qonto webhook signature is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("malformed signature header: {0}")]
    MalformedHeader(String),

    #[error("signature header has no timestamp")]
    MissingTimestamp,

    #[error("signature header has no v1 signature")]
    MissingSignature,

    #[error("timestamp {timestamp} is outside the {tolerance_secs}s tolerance")]
    TimestampOutsideTolerance { timestamp: i64, tolerance_secs: u64 },

    #[error("signature does not match payload")]
    SignatureMismatch,

    #[error("webhook secret is empty")]
    EmptySecret,
}
