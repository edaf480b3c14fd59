use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::collections::Collection;
use crate::enums::ClientStatus;

/// A planner's customer (usually a couple).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Client {
    pub id: String,
    pub planner_id: String,
    pub name: String,
    pub partner_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub wedding_date: Option<NaiveDate>,
    pub budget_cents: Option<i64>,
    #[serde(default)]
    pub status: ClientStatus,
    pub notes: Option<String>,
    /// Email the client signs into the portal with.
    pub portal_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(Client, Collection::Clients, "client");
