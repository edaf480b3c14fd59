//! Qonto banking API configuration.

use serde::{Deserialize, Serialize};

pub const QONTO_PRODUCTION_URL: &str = "https://thirdparty.qonto.com";
pub const QONTO_SANDBOX_URL: &str = "https://thirdparty-sandbox.staging.qonto.co";

const fn default_webhook_tolerance_secs() -> u64 {
    300
}

fn default_redirect_uri() -> String {
    "http://127.0.0.1:8765/callback".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QontoConfig {
    /// Organization login (API key authentication).
    #[serde(default)]
    pub login: String,

    /// Secret key paired with `login`.
    #[serde(default)]
    pub secret_key: String,

    /// OAuth access token for a single organization.
    #[serde(default)]
    pub access_token: String,

    /// OAuth client used by `noces qonto connect`.
    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,

    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,

    /// Use the sandbox environment.
    #[serde(default)]
    pub sandbox: bool,

    /// `X-Qonto-Staging-Token` header value, required in sandbox.
    #[serde(default)]
    pub staging_token: String,

    /// Overrides the API base URL (tests, proxies).
    #[serde(default)]
    pub base_url: String,

    /// Shared secret for webhook signatures.
    #[serde(default)]
    pub webhook_secret: String,

    /// Maximum age of a signed webhook, in seconds.
    #[serde(default = "default_webhook_tolerance_secs")]
    pub webhook_tolerance_secs: u64,
}

impl Default for QontoConfig {
    fn default() -> Self {
        Self {
            login: String::new(),
            secret_key: String::new(),
            access_token: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: default_redirect_uri(),
            sandbox: false,
            staging_token: String::new(),
            base_url: String::new(),
            webhook_secret: String::new(),
            webhook_tolerance_secs: default_webhook_tolerance_secs(),
        }
    }
}

impl QontoConfig {
    /// Any way to authenticate API calls.
    pub fn is_configured(&self) -> bool {
        self.has_api_key() || !self.access_token.is_empty() || self.has_oauth_client()
    }

    pub fn has_api_key(&self) -> bool {
        !self.login.is_empty() && !self.secret_key.is_empty()
    }

    pub fn has_oauth_client(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }

    /// Base URL honoring the override, then the sandbox flag.
    pub fn api_base_url(&self) -> &str {
        if !self.base_url.is_empty() {
            &self.base_url
        } else if self.sandbox {
            QONTO_SANDBOX_URL
        } else {
            QONTO_PRODUCTION_URL
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = QontoConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.webhook_tolerance_secs, 300);
        assert_eq!(config.api_base_url(), QONTO_PRODUCTION_URL);
    }

    #[test]
    fn api_key_needs_both_parts() {
        let config = QontoConfig {
            login: "org-slug".into(),
            ..Default::default()
        };
        assert!(!config.has_api_key());
        assert!(!config.is_configured());
    }

    #[test]
    fn sandbox_and_override_urls() {
        let mut config = QontoConfig {
            sandbox: true,
            ..Default::default()
        };
        assert_eq!(config.api_base_url(), QONTO_SANDBOX_URL);

        config.base_url = "http://127.0.0.1:9000".into();
        assert_eq!(config.api_base_url(), "http://127.0.0.1:9000");
    }
}
