//! Qonto: payment links, OAuth, webhook verification and invoice
//! reconciliation.

mod credentials;
mod oauth;
mod payment_links;
mod reconcile;
mod webhook;

pub use credentials::{QONTO_PROVIDER, QontoAuth};
pub use oauth::{OAuthToken, QontoOAuth, generate_state};
pub use payment_links::{
    Amount, NewPaymentLink, Payment, PaymentLink, PaymentMethod, PaymentStatus,
};
pub use reconcile::reconcile_invoice_payment;
pub use webhook::{SIGNATURE_HEADER, WebhookEvent, WebhookVerifier, sign_payload};

use chrono::Utc;
use noces_config::QontoConfig;
use noces_core::entities::IntegrationCredentials;

use crate::http::build_client;

/// Qonto third-party API client (v2).
pub struct QontoClient {
    http: reqwest::Client,
    base_url: String,
    auth: QontoAuth,
    staging_token: Option<String>,
}

impl QontoClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>, auth: QontoAuth) -> Self {
        Self {
            http: build_client(20),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
            staging_token: None,
        }
    }

    /// Send `X-Qonto-Staging-Token` with every request (sandbox only).
    #[must_use]
    pub fn with_staging_token(mut self, token: impl Into<String>) -> Self {
        self.staging_token = Some(token.into());
        self
    }

    /// Client for the configured environment, authenticated with the best
    /// available credentials (see [`QontoAuth::resolve`]).
    ///
    /// # Errors
    ///
    /// Returns `IntegrationError::NotConfigured` when no credentials exist.
    pub fn from_config(
        config: &QontoConfig,
        stored: Option<&IntegrationCredentials>,
    ) -> Result<Self, crate::IntegrationError> {
        let auth = QontoAuth::resolve(stored, config, Utc::now())?;
        tracing::debug!(source = auth.source(), base_url = config.api_base_url(), "qonto client");
        let client = Self::new(config.api_base_url(), auth);
        Ok(if config.sandbox && !config.staging_token.is_empty() {
            client.with_staging_token(&config.staging_token)
        } else {
            client
        })
    }

    #[must_use]
    pub const fn auth(&self) -> &QontoAuth {
        &self.auth
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/v2{path}", self.base_url);
        tracing::debug!(%method, %url, "qonto request");
        let builder = self
            .http
            .request(method, url)
            .header(reqwest::header::AUTHORIZATION, self.auth.authorization())
            .header(reqwest::header::ACCEPT, "application/json");
        match &self.staging_token {
            Some(token) => builder.header("X-Qonto-Staging-Token", token),
            None => builder,
        }
    }
}
