use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One billed line of a devis or invoice.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LineItem {
    pub label: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
}

impl LineItem {
    /// `quantity * unit_price_cents`, or `None` on overflow.
    #[must_use]
    pub fn line_total_cents(&self) -> Option<i64> {
        i64::from(self.quantity).checked_mul(self.unit_price_cents)
    }
}

/// Sum of all line totals, or `None` on overflow.
#[must_use]
pub fn items_total(items: &[LineItem]) -> Option<i64> {
    items
        .iter()
        .try_fold(0_i64, |acc, item| acc.checked_add(item.line_total_cents()?))
}
