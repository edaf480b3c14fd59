use chrono::{DateTime, Utc};
use noces_core::entities::{Contract, Devis, SignatureTracking, Signer};
use noces_core::enums::{ContractStatus, DevisStatus, EnvelopeStatus};
use noces_core::sync::{ContractSignaturePatch, DevisSignaturePatch, SignaturePatch};

use super::envelopes::{Envelope, Recipient};

fn parse_time(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|at| at.with_timezone(&Utc))
}

/// Mirror an envelope and its signers into a signature block.
///
/// `signed_pdf_url` is not known to DocuSign and is carried over from
/// `previous`.
#[must_use]
pub fn signature_from_envelope(
    envelope: &Envelope,
    recipients: &[Recipient],
    previous: Option<&SignatureTracking>,
) -> SignatureTracking {
    SignatureTracking {
        envelope_id: envelope.envelope_id.clone(),
        envelope_status: envelope.status,
        signers: recipients
            .iter()
            .map(|r| Signer {
                name: r.name.clone(),
                email: r.email.clone(),
                status: r.status,
                signed_at: parse_time(r.signed_date_time.as_deref()),
            })
            .collect(),
        sent_at: parse_time(envelope.sent_date_time.as_deref())
            .or_else(|| previous.and_then(|p| p.sent_at)),
        completed_at: parse_time(envelope.completed_date_time.as_deref()),
        signed_pdf_url: previous.and_then(|p| p.signed_pdf_url.clone()),
    }
}

fn contract_status_for(envelope: EnvelopeStatus, signature: &SignatureTracking) -> Option<ContractStatus> {
    match envelope {
        EnvelopeStatus::Completed => Some(ContractStatus::Signed),
        EnvelopeStatus::Declined => Some(ContractStatus::Declined),
        EnvelopeStatus::Voided => Some(ContractStatus::Voided),
        EnvelopeStatus::Sent | EnvelopeStatus::Delivered | EnvelopeStatus::Signed => {
            Some(if signature.signed_count() > 0 {
                ContractStatus::PartiallySigned
            } else {
                ContractStatus::Sent
            })
        }
        EnvelopeStatus::Created | EnvelopeStatus::Unknown => None,
    }
}

const fn devis_status_for(envelope: EnvelopeStatus) -> Option<DevisStatus> {
    match envelope {
        EnvelopeStatus::Completed => Some(DevisStatus::Accepted),
        EnvelopeStatus::Declined => Some(DevisStatus::Rejected),
        EnvelopeStatus::Sent | EnvelopeStatus::Delivered | EnvelopeStatus::Signed => {
            Some(DevisStatus::Sent)
        }
        EnvelopeStatus::Voided | EnvelopeStatus::Created | EnvelopeStatus::Unknown => None,
    }
}

/// Keep `current` when the envelope implies no status, the same one, or a
/// move the state machine forbids.
fn next_status<S: Copy + PartialEq + std::fmt::Display>(
    current: S,
    implied: Option<S>,
    allowed: impl Fn(S, S) -> bool,
    id: &str,
) -> S {
    match implied {
        Some(next) if next != current && allowed(current, next) => next,
        Some(next) if next != current => {
            tracing::warn!(id, %current, %next, "envelope implies a forbidden transition; keeping status");
            current
        }
        _ => current,
    }
}

fn patch_if_changed<S: PartialEq>(
    current_signature: Option<&SignatureTracking>,
    current_status: S,
    patch: SignaturePatch<S>,
) -> Option<SignaturePatch<S>> {
    let unchanged =
        current_signature == Some(&patch.signature) && current_status == patch.status;
    (!unchanged).then_some(patch)
}

/// Signature patch for a contract: `completed` signs it, `declined` and
/// `voided` close it, and an envelope still out moves it to `sent` or
/// `partially_signed` once someone signed. `None` when nothing changed.
#[must_use]
pub fn reconcile_contract_signature(
    contract: &Contract,
    envelope: &Envelope,
    recipients: &[Recipient],
) -> Option<ContractSignaturePatch> {
    let signature = signature_from_envelope(envelope, recipients, contract.signature.as_ref());
    let status = next_status(
        contract.status,
        contract_status_for(envelope.status, &signature),
        ContractStatus::can_transition_to,
        &contract.id,
    );
    patch_if_changed(
        contract.signature.as_ref(),
        contract.status,
        SignaturePatch { signature, status },
    )
}

/// Signature patch for a devis: `completed` accepts it, `declined` rejects
/// it, a voided envelope leaves the status alone. `None` when nothing changed.
#[must_use]
pub fn reconcile_devis_signature(
    devis: &Devis,
    envelope: &Envelope,
    recipients: &[Recipient],
) -> Option<DevisSignaturePatch> {
    let signature = signature_from_envelope(envelope, recipients, devis.signature.as_ref());
    let status = next_status(
        devis.status,
        devis_status_for(envelope.status),
        DevisStatus::can_transition_to,
        &devis.id,
    );
    patch_if_changed(
        devis.signature.as_ref(),
        devis.status,
        SignaturePatch { signature, status },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use noces_core::enums::RecipientStatus;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn envelope(status: EnvelopeStatus) -> Envelope {
        Envelope {
            envelope_id: "env-1".into(),
            status,
            email_subject: None,
            sent_date_time: Some("2026-03-01T09:00:00.0000000Z".into()),
            completed_date_time: (status == EnvelopeStatus::Completed)
                .then(|| "2026-03-02T18:30:00Z".into()),
            voided_reason: None,
        }
    }

    fn recipient(id: &str, status: RecipientStatus) -> Recipient {
        Recipient {
            recipient_id: id.into(),
            name: format!("Signer {id}"),
            email: format!("signer{id}@example.com"),
            status,
            routing_order: Some(id.into()),
            signed_date_time: status
                .has_signed()
                .then(|| "2026-03-02T10:00:00Z".into()),
        }
    }

    fn contract(status: ContractStatus) -> Contract {
        Contract {
            id: "ctr-1".into(),
            planner_id: "uid-1".into(),
            client_id: "cli-1".into(),
            title: "Contrat".into(),
            status,
            signature: None,
            pdf_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn devis(status: DevisStatus) -> Devis {
        Devis {
            id: "dev-1".into(),
            planner_id: "uid-1".into(),
            client_id: "cli-1".into(),
            number: "D-1".into(),
            items: Vec::new(),
            total_cents: 0,
            status,
            valid_until: None,
            signature: None,
            invoice_id: None,
            pdf_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[rstest]
    #[case(EnvelopeStatus::Completed, RecipientStatus::Completed, ContractStatus::Signed)]
    #[case(EnvelopeStatus::Declined, RecipientStatus::Declined, ContractStatus::Declined)]
    #[case(EnvelopeStatus::Voided, RecipientStatus::Sent, ContractStatus::Voided)]
    #[case(EnvelopeStatus::Delivered, RecipientStatus::Completed, ContractStatus::PartiallySigned)]
    #[case(EnvelopeStatus::Delivered, RecipientStatus::Delivered, ContractStatus::Sent)]
    fn contract_status_mapping(
        #[case] envelope_status: EnvelopeStatus,
        #[case] first_signer: RecipientStatus,
        #[case] expected: ContractStatus,
    ) {
        let recipients = [
            recipient("1", first_signer),
            recipient("2", RecipientStatus::Sent),
        ];
        let patch = reconcile_contract_signature(
            &contract(ContractStatus::Sent),
            &envelope(envelope_status),
            &recipients,
        )
        .unwrap();
        assert_eq!(patch.status, expected);
        assert_eq!(patch.signature.envelope_status, envelope_status);
        assert_eq!(patch.signature.signers.len(), 2);
    }

    #[rstest]
    #[case(EnvelopeStatus::Completed, DevisStatus::Accepted)]
    #[case(EnvelopeStatus::Declined, DevisStatus::Rejected)]
    #[case(EnvelopeStatus::Voided, DevisStatus::Sent)]
    #[case(EnvelopeStatus::Delivered, DevisStatus::Sent)]
    fn devis_status_mapping(#[case] envelope_status: EnvelopeStatus, #[case] expected: DevisStatus) {
        let patch = reconcile_devis_signature(
            &devis(DevisStatus::Sent),
            &envelope(envelope_status),
            &[recipient("1", RecipientStatus::Sent)],
        )
        .unwrap();
        assert_eq!(patch.status, expected);
    }

    #[test]
    fn applying_the_same_envelope_twice_is_a_no_op() {
        let mut contract = contract(ContractStatus::Sent);
        let env = envelope(EnvelopeStatus::Completed);
        let recipients = [recipient("1", RecipientStatus::Completed)];

        let patch = reconcile_contract_signature(&contract, &env, &recipients).unwrap();
        contract.signature = Some(patch.signature);
        contract.status = patch.status;

        assert_eq!(reconcile_contract_signature(&contract, &env, &recipients), None);
    }

    #[test]
    fn signed_contract_is_not_reopened() {
        let mut contract = contract(ContractStatus::Signed);
        let env = envelope(EnvelopeStatus::Delivered);
        let recipients = [recipient("1", RecipientStatus::Delivered)];
        contract.signature = Some(signature_from_envelope(&env, &recipients, None));
        assert_eq!(reconcile_contract_signature(&contract, &env, &recipients), None);
    }

    #[test]
    fn signature_keeps_signed_pdf_url_and_parses_times() {
        let previous = SignatureTracking {
            envelope_id: "env-1".into(),
            envelope_status: EnvelopeStatus::Sent,
            signers: Vec::new(),
            sent_at: None,
            completed_at: None,
            signed_pdf_url: Some("https://res.cloudinary.com/demo/signed.pdf".into()),
        };
        let signature = signature_from_envelope(
            &envelope(EnvelopeStatus::Completed),
            &[recipient("1", RecipientStatus::Completed)],
            Some(&previous),
        );
        assert_eq!(signature.signed_pdf_url, previous.signed_pdf_url);
        assert_eq!(
            signature.completed_at.unwrap().to_rfc3339(),
            "2026-03-02T18:30:00+00:00"
        );
        assert!(signature.sent_at.is_some());
        assert!(signature.signers[0].signed_at.is_some());
    }
}
