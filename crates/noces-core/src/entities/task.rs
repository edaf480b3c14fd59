use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::collections::Collection;
use crate::enums::{TaskPriority, TaskStatus};

/// A planning to-do, optionally tied to a client or event.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub planner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub client_id: Option<String>,
    pub event_id: Option<String>,
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(Task, Collection::Tasks, "task");
