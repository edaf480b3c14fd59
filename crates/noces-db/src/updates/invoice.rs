//! Invoice inputs and update builder.

use chrono::NaiveDate;
use noces_core::entities::LineItem;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewInvoice {
    pub client_id: String,
    pub number: String,
    #[serde(default)]
    pub items: Vec<LineItem>,
    /// Required without items; must match their sum otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cents: Option<i64>,
    pub due_date: Option<NaiveDate>,
}

/// Payment fields are not updatable here: see `record_payment` and
/// `apply_payment_reconciliation`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<LineItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<Option<String>>,
}

pub struct InvoiceUpdateBuilder(InvoiceUpdate);

impl InvoiceUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(InvoiceUpdate::default())
    }

    #[must_use]
    pub fn number(mut self, number: impl Into<String>) -> Self {
        self.0.number = Some(number.into());
        self
    }

    #[must_use]
    pub fn items(mut self, items: Vec<LineItem>) -> Self {
        self.0.items = Some(items);
        self
    }

    #[must_use]
    pub const fn total_cents(mut self, total_cents: i64) -> Self {
        self.0.total_cents = Some(total_cents);
        self
    }

    #[must_use]
    pub const fn due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.0.due_date = Some(due_date);
        self
    }

    #[must_use]
    pub fn pdf_url(mut self, pdf_url: Option<String>) -> Self {
        self.0.pdf_url = Some(pdf_url);
        self
    }

    #[must_use]
    pub fn build(self) -> InvoiceUpdate {
        self.0
    }
}

impl Default for InvoiceUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
