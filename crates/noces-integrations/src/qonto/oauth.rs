use chrono::{DateTime, TimeDelta, Utc};
use noces_config::QontoConfig;
use serde::Deserialize;

use crate::error::IntegrationError;
use crate::http::{build_client, check_response, form_body};

const OAUTH_URL: &str = "https://oauth.qonto.com";
const OAUTH_SANDBOX_URL: &str = "https://oauth-sandbox.staging.qonto.co";

/// Scopes requested by `noces qonto connect`.
pub const DEFAULT_SCOPES: &str =
    "offline_access organization.read payment_link.read payment_link.write";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OAuthToken {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl OAuthToken {
    #[must_use]
    pub fn expires_at(&self, issued_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.expires_in
            .map(|secs| issued_at + TimeDelta::seconds(secs))
    }
}

/// Qonto OAuth 2.0 authorization-code client.
pub struct QontoOAuth {
    http: reqwest::Client,
    oauth_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl QontoOAuth {
    /// # Errors
    ///
    /// Returns `IntegrationError::NotConfigured` without an OAuth client
    /// id and secret.
    pub fn from_config(config: &QontoConfig) -> Result<Self, IntegrationError> {
        if !config.has_oauth_client() {
            return Err(IntegrationError::NotConfigured {
                integration: "Qonto OAuth",
                hint: "set NOCES_QONTO__CLIENT_ID and NOCES_QONTO__CLIENT_SECRET",
            });
        }
        Ok(Self {
            http: build_client(20),
            oauth_url: if config.sandbox {
                OAUTH_SANDBOX_URL
            } else {
                OAUTH_URL
            }
            .to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
        })
    }

    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// URL the planner opens to grant access; `state` comes back on the
    /// redirect and must be checked by the caller.
    #[must_use]
    pub fn authorize_url(&self, state: &str) -> String {
        format!(
            "{}/oauth2/auth?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
            self.oauth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(DEFAULT_SCOPES),
            urlencoding::encode(state),
        )
    }

    /// # Errors
    ///
    /// Returns HTTP/API errors from the token endpoint.
    pub async fn exchange_code(&self, code: &str) -> Result<OAuthToken, IntegrationError> {
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &self.redirect_uri),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
        ])
        .await
    }

    /// # Errors
    ///
    /// Returns HTTP/API errors from the token endpoint.
    pub async fn refresh(&self, refresh_token: &str) -> Result<OAuthToken, IntegrationError> {
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
        ])
        .await
    }

    async fn token_request(&self, pairs: &[(&str, &str)]) -> Result<OAuthToken, IntegrationError> {
        let resp = self
            .http
            .post(format!("{}/oauth2/token", self.oauth_url))
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(form_body(pairs))
            .send()
            .await?;
        let resp = check_response(resp).await.map_err(|e| match e {
            IntegrationError::Api { status, message } => IntegrationError::Auth {
                integration: "Qonto",
                message: format!("token endpoint returned {status}: {message}"),
            },
            other => other,
        })?;
        Ok(resp.json().await?)
    }
}

/// Random 16-byte hex nonce for the OAuth `state` parameter.
///
/// # Errors
///
/// Returns `IntegrationError::Auth` if the OS random source fails.
pub fn generate_state() -> Result<String, IntegrationError> {
    let mut bytes = [0u8; 16];
    getrandom::fill(&mut bytes).map_err(|e| IntegrationError::Auth {
        integration: "Qonto",
        message: format!("failed to generate state nonce: {e}"),
    })?;
    Ok(hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(sandbox: bool) -> QontoConfig {
        QontoConfig {
            client_id: "client 1".into(),
            client_secret: "secret".into(),
            sandbox,
            ..QontoConfig::default()
        }
    }

    #[test]
    fn authorize_url_encodes_parameters() {
        let oauth = QontoOAuth::from_config(&config(false)).unwrap();
        let url = oauth.authorize_url("abc123");
        assert!(url.starts_with("https://oauth.qonto.com/oauth2/auth?client_id=client%201"));
        assert!(url.contains("redirect_uri=http%3A%2F%2F127.0.0.1%3A8765%2Fcallback"));
        assert!(url.contains("scope=offline_access%20organization.read"));
        assert!(url.ends_with("&state=abc123"));
    }

    #[test]
    fn sandbox_uses_staging_oauth() {
        let oauth = QontoOAuth::from_config(&config(true)).unwrap();
        assert!(oauth.authorize_url("s").starts_with(OAUTH_SANDBOX_URL));
    }

    #[test]
    fn requires_client_credentials() {
        let err = QontoOAuth::from_config(&QontoConfig::default()).err().unwrap();
        assert!(matches!(err, IntegrationError::NotConfigured { .. }));
    }

    #[test]
    fn state_is_random_hex() {
        let a = generate_state().unwrap();
        let b = generate_state().unwrap();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn token_expiry_from_issue_time() {
        let token: OAuthToken = serde_json::from_str(
            r#"{"access_token":"at","refresh_token":"rt","expires_in":3600,"token_type":"bearer"}"#,
        )
        .unwrap();
        let issued = Utc::now();
        assert_eq!(token.expires_at(issued), Some(issued + TimeDelta::hours(1)));
    }
}
