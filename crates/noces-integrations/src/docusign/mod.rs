//! DocuSign eSignature REST v2.1: envelopes, recipients and signature
//! reconciliation.

mod envelopes;
mod jwt;
mod reconcile;

pub use envelopes::{Envelope, EnvelopeSummary, NewEnvelope, Recipient, SignerInput};
pub use reconcile::{reconcile_contract_signature, reconcile_devis_signature, signature_from_envelope};

use noces_config::DocuSignConfig;

use crate::error::IntegrationError;
use crate::http::build_client;

/// Where the access token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocuSignTokenSource {
    Configured,
    JwtGrant,
}

/// DocuSign client bound to one account.
pub struct DocuSignClient {
    http: reqwest::Client,
    api_base: String,
    access_token: String,
    token_source: DocuSignTokenSource,
}

impl DocuSignClient {
    /// Client for `account_id` on `base_uri` with a ready access token.
    #[must_use]
    pub fn new(base_uri: &str, account_id: &str, access_token: impl Into<String>) -> Self {
        Self {
            http: build_client(30),
            api_base: format!(
                "{}/restapi/v2.1/accounts/{}",
                base_uri.trim_end_matches('/'),
                urlencoding::encode(account_id)
            ),
            access_token: access_token.into(),
            token_source: DocuSignTokenSource::Configured,
        }
    }

    /// Authenticate from configuration: the configured access token, else a
    /// JWT grant with the integration key and RSA key.
    ///
    /// # Errors
    ///
    /// Returns `IntegrationError::NotConfigured` without an account or
    /// credentials, and `IntegrationError::Auth` if the JWT grant fails.
    pub async fn connect(config: &DocuSignConfig) -> Result<Self, IntegrationError> {
        if !config.is_configured() {
            return Err(IntegrationError::NotConfigured {
                integration: "DocuSign",
                hint: "set NOCES_DOCUSIGN__ACCOUNT_ID plus an access token or JWT grant keys",
            });
        }
        if !config.access_token.is_empty() {
            return Ok(Self::new(&config.base_uri, &config.account_id, &config.access_token));
        }

        let mut client = Self::new(&config.base_uri, &config.account_id, String::new());
        let token = jwt::request_token(&client.http, config).await?;
        client.access_token = token.access_token;
        client.token_source = DocuSignTokenSource::JwtGrant;
        Ok(client)
    }

    #[must_use]
    pub const fn token_source(&self) -> DocuSignTokenSource {
        self.token_source
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.api_base);
        tracing::debug!(%method, %url, "docusign request");
        self.http
            .request(method, url)
            .bearer_auth(&self.access_token)
    }
}
