//! Patches produced by reconciling external state (Qonto payment links,
//! DocuSign envelopes) into documents.
//!
//! Computed by the pure reconciliation functions in `noces-integrations` and
//! applied by the repositories in `noces-db`. A reconciler returns `None`
//! instead of a patch when the document already reflects the external state.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::SignatureTracking;
use crate::enums::{ContractStatus, DevisStatus, InvoiceStatus, PaymentLinkStatus};

/// Payment state of an invoice as reported by its payment link.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct InvoicePaymentPatch {
    pub paid_cents: i64,
    pub status: InvoiceStatus,
    pub payment_link_status: Option<PaymentLinkStatus>,
    pub paid_at: Option<DateTime<Utc>>,
}

/// Signature block and resulting status of a signed document.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SignaturePatch<S> {
    pub signature: SignatureTracking,
    pub status: S,
}

pub type DevisSignaturePatch = SignaturePatch<DevisStatus>;
pub type ContractSignaturePatch = SignaturePatch<ContractStatus>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::EnvelopeStatus;

    #[test]
    fn signature_patch_serializes_status_snake_case() {
        let patch = ContractSignaturePatch {
            signature: SignatureTracking {
                envelope_id: "env-1".into(),
                envelope_status: EnvelopeStatus::Sent,
                signers: Vec::new(),
                sent_at: None,
                completed_at: None,
                signed_pdf_url: None,
            },
            status: ContractStatus::PartiallySigned,
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json["status"], "partially_signed");
        assert_eq!(json["signature"]["envelope_status"], "sent");
    }
}
