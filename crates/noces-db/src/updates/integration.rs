//! Integration credential input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OAuth tokens obtained for a planner from an external provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIntegrationCredentials {
    pub provider: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub scope: Option<String>,
}
