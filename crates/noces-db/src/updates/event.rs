//! Event inputs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewEvent {
    pub client_id: String,
    pub title: String,
    pub date: Option<NaiveDate>,
    pub venue: Option<String>,
    pub guest_count: Option<u32>,
    pub notes: Option<String>,
}

/// The owning client of an event cannot change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_count: Option<Option<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}
