use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::signature::SignatureTracking;
use crate::collections::Collection;
use crate::enums::ContractStatus;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Contract {
    pub id: String,
    pub planner_id: String,
    pub client_id: String,
    pub title: String,
    #[serde(default)]
    pub status: ContractStatus,
    pub signature: Option<SignatureTracking>,
    pub pdf_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(Contract, Collection::Contracts, "contract");
