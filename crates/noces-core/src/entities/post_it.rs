use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::collections::Collection;
use crate::enums::PostItColor;

/// A sticky note on the planner board, optionally shared with a client.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PostIt {
    pub id: String,
    pub planner_id: String,
    pub content: String,
    #[serde(default)]
    pub color: PostItColor,
    pub client_id: Option<String>,
    #[serde(default)]
    pub pinned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(PostIt, Collection::PostIts, "post-it");
