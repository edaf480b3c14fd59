use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::line_item::LineItem;
use super::signature::SignatureTracking;
use crate::collections::Collection;
use crate::enums::DevisStatus;

/// A quote. Accepted quotes convert into exactly one invoice.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Devis {
    pub id: String,
    pub planner_id: String,
    pub client_id: String,
    pub number: String,
    #[serde(default)]
    pub items: Vec<LineItem>,
    pub total_cents: i64,
    #[serde(default)]
    pub status: DevisStatus,
    pub valid_until: Option<NaiveDate>,
    pub signature: Option<SignatureTracking>,
    /// Set once the devis has been converted.
    pub invoice_id: Option<String>,
    pub pdf_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(Devis, Collection::Devis, "devis");
