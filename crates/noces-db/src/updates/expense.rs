//! Expense inputs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewExpense {
    pub label: String,
    pub category: Option<String>,
    pub amount_cents: i64,
    pub date: Option<NaiveDate>,
    pub client_id: Option<String>,
    pub event_id: Option<String>,
    pub vendor_id: Option<String>,
    #[serde(default)]
    pub paid: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid: Option<bool>,
}
