use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::line_item::LineItem;
use crate::collections::Collection;
use crate::enums::{InvoiceStatus, PaymentLinkStatus};

/// A bill sent to a client, payable through a Qonto payment link.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Invoice {
    pub id: String,
    pub planner_id: String,
    pub client_id: String,
    pub number: String,
    #[serde(default)]
    pub items: Vec<LineItem>,
    pub total_cents: i64,
    #[serde(default)]
    pub paid_cents: i64,
    #[serde(default)]
    pub status: InvoiceStatus,
    pub due_date: Option<NaiveDate>,
    /// Devis this invoice was converted from.
    pub devis_id: Option<String>,
    pub qonto_payment_link_id: Option<String>,
    pub payment_link_url: Option<String>,
    pub payment_link_status: Option<PaymentLinkStatus>,
    /// `paid_cents` when the current payment link was attached; link
    /// payments add to it.
    #[serde(default)]
    pub paid_before_link_cents: i64,
    pub paid_at: Option<DateTime<Utc>>,
    pub pdf_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    #[must_use]
    pub const fn remaining_cents(&self) -> i64 {
        self.total_cents - self.paid_cents
    }
}

impl_entity!(Invoice, Collection::Invoices, "invoice");
