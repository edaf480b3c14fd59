use chrono::{DateTime, TimeDelta, Utc};
use noces_config::QontoConfig;
use noces_core::entities::IntegrationCredentials;

use crate::error::IntegrationError;

/// Provider key of Qonto credentials in the `integrations` collection.
pub const QONTO_PROVIDER: &str = "qonto";

/// How requests to the Qonto API are authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QontoAuth {
    /// Token the planner obtained through `noces qonto connect`.
    PlannerOAuth { access_token: String },
    /// OAuth access token set in configuration.
    ConfiguredToken { access_token: String },
    /// Organization API key (`login:secret_key`).
    ApiKey { login: String, secret_key: String },
}

impl QontoAuth {
    /// Pick credentials in order: the planner's stored OAuth token, the
    /// configured access token, then the configured API key.
    ///
    /// Expired stored tokens are skipped; refreshing them is up to the caller.
    ///
    /// # Errors
    ///
    /// Returns `IntegrationError::NotConfigured` when nothing usable exists.
    pub fn resolve(
        stored: Option<&IntegrationCredentials>,
        config: &QontoConfig,
        now: DateTime<Utc>,
    ) -> Result<Self, IntegrationError> {
        if let Some(credentials) = stored {
            if credentials.expires_within(now, TimeDelta::zero()) {
                tracing::warn!(
                    planner_id = %credentials.planner_id,
                    "stored Qonto token expired; falling back to configured credentials"
                );
            } else {
                return Ok(Self::PlannerOAuth {
                    access_token: credentials.access_token.clone(),
                });
            }
        }
        if !config.access_token.is_empty() {
            return Ok(Self::ConfiguredToken {
                access_token: config.access_token.clone(),
            });
        }
        if config.has_api_key() {
            return Ok(Self::ApiKey {
                login: config.login.clone(),
                secret_key: config.secret_key.clone(),
            });
        }
        Err(IntegrationError::NotConfigured {
            integration: "Qonto",
            hint: "run `noces qonto connect` or set NOCES_QONTO__LOGIN and NOCES_QONTO__SECRET_KEY",
        })
    }

    /// Short label for status output.
    #[must_use]
    pub const fn source(&self) -> &'static str {
        match self {
            Self::PlannerOAuth { .. } => "planner oauth",
            Self::ConfiguredToken { .. } => "configured token",
            Self::ApiKey { .. } => "api key",
        }
    }

    pub(crate) fn authorization(&self) -> String {
        match self {
            Self::PlannerOAuth { access_token } | Self::ConfiguredToken { access_token } => {
                format!("Bearer {access_token}")
            }
            Self::ApiKey { login, secret_key } => format!("{login}:{secret_key}"),
        }
    }
}
