use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{EnvelopeStatus, RecipientStatus};

/// E-signature state of a devis or contract, mirrored from the DocuSign envelope.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SignatureTracking {
    pub envelope_id: String,
    pub envelope_status: EnvelopeStatus,
    #[serde(default)]
    pub signers: Vec<Signer>,
    pub sent_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub signed_pdf_url: Option<String>,
}

impl SignatureTracking {
    /// Number of signers that have signed.
    #[must_use]
    pub fn signed_count(&self) -> usize {
        self.signers.iter().filter(|s| s.status.has_signed()).count()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Signer {
    pub name: String,
    pub email: String,
    pub status: RecipientStatus,
    pub signed_at: Option<DateTime<Utc>>,
}
