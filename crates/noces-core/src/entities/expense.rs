use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::collections::Collection;

/// Money spent by the planner on behalf of a client or event.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Expense {
    pub id: String,
    pub planner_id: String,
    pub label: String,
    pub category: Option<String>,
    /// Always strictly positive.
    pub amount_cents: i64,
    pub date: Option<NaiveDate>,
    pub client_id: Option<String>,
    pub event_id: Option<String>,
    pub vendor_id: Option<String>,
    #[serde(default)]
    pub paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(Expense, Collection::Expenses, "expense");
