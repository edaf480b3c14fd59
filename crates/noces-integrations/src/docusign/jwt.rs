//! OAuth JWT grant ("service integration") for DocuSign.

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use noces_config::DocuSignConfig;
use serde::{Deserialize, Serialize};

use crate::error::IntegrationError;
use crate::http::{check_response, form_body};

const JWT_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const SCOPES: &str = "signature impersonation";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Serialize)]
struct GrantClaims<'a> {
    iss: &'a str,
    sub: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
    scope: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GrantToken {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

fn auth_error(message: impl Into<String>) -> IntegrationError {
    IntegrationError::Auth {
        integration: "DocuSign",
        message: message.into(),
    }
}

/// PEM of the RSA key, inline (env files often carry literal `\n`) or from
/// `private_key_path`.
fn private_key_pem(config: &DocuSignConfig) -> Result<String, IntegrationError> {
    if !config.private_key.is_empty() {
        return Ok(config.private_key.replace("\\n", "\n"));
    }
    std::fs::read_to_string(&config.private_key_path)
        .map_err(|e| auth_error(format!("read private key {}: {e}", config.private_key_path)))
}

/// Signed RS256 assertion for the JWT grant.
pub(crate) fn build_assertion(config: &DocuSignConfig, now: i64) -> Result<String, IntegrationError> {
    let pem = private_key_pem(config)?;
    let key = EncodingKey::from_rsa_pem(pem.as_bytes())
        .map_err(|e| auth_error(format!("invalid RSA private key: {e}")))?;
    let claims = GrantClaims {
        iss: &config.integration_key,
        sub: &config.user_id,
        aud: &config.oauth_host,
        iat: now,
        exp: now + ASSERTION_LIFETIME_SECS,
        scope: SCOPES,
    };
    jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)
        .map_err(|e| auth_error(format!("sign assertion: {e}")))
}

/// Exchange a signed assertion for an access token.
pub(crate) async fn request_token(
    http: &reqwest::Client,
    config: &DocuSignConfig,
) -> Result<GrantToken, IntegrationError> {
    let assertion = build_assertion(config, Utc::now().timestamp())?;
    let resp = http
        .post(format!("https://{}/oauth/token", config.oauth_host))
        .header(
            reqwest::header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(form_body(&[("grant_type", JWT_GRANT_TYPE), ("assertion", &assertion)]))
        .send()
        .await?;

    let resp = check_response(resp).await.map_err(|e| match e {
        IntegrationError::Api { message, .. } if message.contains("consent_required") => auth_error(
            format!(
                "consent required: open https://{}/oauth/auth?response_type=code&scope={}&client_id={}&redirect_uri=https://www.docusign.com",
                config.oauth_host,
                urlencoding::encode(SCOPES),
                config.integration_key
            ),
        ),
        IntegrationError::Api { status, message } => {
            auth_error(format!("token endpoint returned {status}: {message}"))
        }
        other => other,
    })?;
    let token: GrantToken = resp.json().await?;
    tracing::debug!(expires_in = ?token.expires_in, "docusign JWT grant token obtained");
    Ok(token)
}
