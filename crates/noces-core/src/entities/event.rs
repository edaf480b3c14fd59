use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::collections::Collection;
use crate::enums::EventStatus;

/// The wedding day of a client. At most one per client.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Event {
    pub id: String,
    pub planner_id: String,
    pub client_id: String,
    pub title: String,
    pub date: Option<NaiveDate>,
    pub venue: Option<String>,
    pub guest_count: Option<u32>,
    #[serde(default)]
    pub status: EventStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(Event, Collection::Events, "event");
