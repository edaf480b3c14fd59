//! Integration clients built from configuration and stored credentials.

use chrono::{DateTime, TimeDelta, Utc};
use noces_core::entities::IntegrationCredentials;
use noces_db::updates::integration::NewIntegrationCredentials;
use noces_integrations::cloudinary::CloudinaryClient;
use noces_integrations::docusign::DocuSignClient;
use noces_integrations::qonto::{OAuthToken, QONTO_PROVIDER, QontoClient, QontoOAuth};

use crate::context::AppContext;

/// Stored tokens expiring within this window are refreshed before use.
const QONTO_REFRESH_MARGIN_SECS: i64 = 60;

/// Qonto client authenticated with the planner's stored OAuth token when
/// present (refreshed if about to expire), else the configured credentials.
pub async fn qonto_client(ctx: &AppContext) -> anyhow::Result<QontoClient> {
    let mut stored = ctx.service.get_integration_credentials(QONTO_PROVIDER).await?;

    if let Some(credentials) = stored.as_ref()
        && credentials.expires_within(Utc::now(), TimeDelta::seconds(QONTO_REFRESH_MARGIN_SECS))
        && ctx.config.qonto.has_oauth_client()
    {
        match refresh_qonto(ctx, credentials).await {
            Ok(refreshed) => stored = Some(refreshed),
            Err(error) => tracing::warn!(error = %format!("{error:#}"), "Qonto token refresh failed"),
        }
    }

    Ok(QontoClient::from_config(&ctx.config.qonto, stored.as_ref())?)
}

async fn refresh_qonto(
    ctx: &AppContext,
    credentials: &IntegrationCredentials,
) -> anyhow::Result<IntegrationCredentials> {
    let refresh_token = credentials
        .refresh_token
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("stored Qonto token has no refresh token"))?;
    let token = QontoOAuth::from_config(&ctx.config.qonto)?
        .refresh(refresh_token)
        .await?;
    let mut input = qonto_credentials(token, Utc::now());
    if input.refresh_token.is_none() {
        input.refresh_token = credentials.refresh_token.clone();
    }
    tracing::debug!("Qonto token refreshed");
    Ok(ctx.service.save_integration_credentials(input).await?)
}

/// Credentials to store for a freshly issued Qonto token.
pub fn qonto_credentials(token: OAuthToken, issued_at: DateTime<Utc>) -> NewIntegrationCredentials {
    NewIntegrationCredentials {
        provider: QONTO_PROVIDER.to_string(),
        expires_at: token.expires_at(issued_at),
        access_token: token.access_token,
        refresh_token: token.refresh_token,
        scope: token.scope,
    }
}

pub async fn docusign_client(ctx: &AppContext) -> anyhow::Result<DocuSignClient> {
    Ok(DocuSignClient::connect(&ctx.config.docusign).await?)
}

/// Cloudinary is optional for signature syncs: `None` when unconfigured.
pub fn optional_cloudinary(ctx: &AppContext) -> anyhow::Result<Option<CloudinaryClient>> {
    if !ctx.config.cloudinary.is_configured() {
        return Ok(None);
    }
    Ok(Some(CloudinaryClient::from_config(&ctx.config.cloudinary)?))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn credentials_carry_absolute_expiry() {
        let issued_at = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
        let token = OAuthToken {
            access_token: "at".into(),
            refresh_token: Some("rt".into()),
            expires_in: Some(3600),
            scope: Some("payment_link.write".into()),
            token_type: Some("bearer".into()),
        };
        let input = qonto_credentials(token, issued_at);
        assert_eq!(input.provider, "qonto");
        assert_eq!(input.expires_at, Some(issued_at + TimeDelta::hours(1)));
        assert_eq!(input.refresh_token.as_deref(), Some("rt"));
    }
}
