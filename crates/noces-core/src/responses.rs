//! Response types returned as JSON by `noces` commands.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Client, Contract, Devis, Event, Invoice, PostIt, Task};

/// Outcome of a batch sync (`invoice sync`, `devis sync`, `contract sync`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SyncReport {
    pub checked: u32,
    pub updated: u32,
    pub failed: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    pub fn record_unchanged(&mut self) {
        self.checked += 1;
    }

    pub fn record_updated(&mut self) {
        self.checked += 1;
        self.updated += 1;
    }

    pub fn record_failure(&mut self, id: impl Into<String>, error: impl Into<String>) {
        self.checked += 1;
        self.failed += 1;
        self.failures.push(SyncFailure {
            id: id.into(),
            error: error.into(),
        });
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SyncFailure {
    pub id: String,
    pub error: String,
}

/// Response from `noces expense total`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExpenseTotal {
    pub scope: String,
    pub scope_id: String,
    pub count: u32,
    pub total_cents: i64,
    pub paid_cents: i64,
}

/// Response from `noces composition cost`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CompositionCost {
    pub composition_id: String,
    pub total_cents: i64,
    /// Article IDs referenced by the composition that no longer exist.
    pub missing_articles: Vec<String>,
}

/// Response from `noces devis convert`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DevisConversion {
    pub devis: Devis,
    pub invoice: Invoice,
}

/// Response from `noces portal`: everything a client can see.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PortalOverview {
    pub client: Client,
    pub event: Option<Event>,
    pub tasks: Vec<Task>,
    pub invoices: Vec<Invoice>,
    pub devis: Vec<Devis>,
    pub contracts: Vec<Contract>,
    pub post_its: Vec<PostIt>,
}

/// Response from `noces file upload`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FileUploadResponse {
    pub secure_url: String,
    pub public_id: String,
    pub collection: Option<String>,
    pub document_id: Option<String>,
    pub field: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_report_counts() {
        let mut report = SyncReport::default();
        report.record_unchanged();
        report.record_updated();
        report.record_failure("inv-1", "Qonto API error 500");
        assert_eq!(report.checked, 3);
        assert_eq!(report.updated, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.failures[0].id, "inv-1");
    }

    #[test]
    fn empty_failures_omitted() {
        let json = serde_json::to_value(SyncReport::default()).unwrap();
        assert!(json.get("failures").is_none());
    }
}
