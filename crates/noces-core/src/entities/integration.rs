use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::collections::Collection;

/// OAuth tokens a planner granted to a third-party provider.
///
/// Stored in the internal `integrations` collection under the document ID
/// `<provider>:<planner_id>`, so there is at most one per planner and provider.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct IntegrationCredentials {
    pub id: String,
    pub planner_id: String,
    pub provider: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub scope: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IntegrationCredentials {
    /// Document ID for a provider/planner pair.
    #[must_use]
    pub fn document_id(provider: &str, planner_id: &str) -> String {
        format!("{provider}:{planner_id}")
    }

    /// Whether the access token expires within `margin` of `now`.
    #[must_use]
    pub fn expires_within(&self, now: DateTime<Utc>, margin: chrono::Duration) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now + margin)
    }
}

impl_entity!(
    IntegrationCredentials,
    Collection::Integrations,
    "integration"
);
