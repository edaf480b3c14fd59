//! Contract repository: transitions and signature tracking.

use noces_core::entities::{Contract, Entity, SignatureTracking};
use noces_core::enums::ContractStatus;
use noces_core::errors::CoreError;
use noces_core::sync::ContractSignaturePatch;
use noces_core::validation::require_non_blank;
use serde_json::{Value, json};

use super::{invalid_transition, to_body, to_patch};
use crate::error::DatabaseError;
use crate::query::{FilterOp, Query};
use crate::service::NocesService;
use crate::updates::contract::{ContractUpdate, NewContract};

fn validate_contract(contract: &Contract) -> Result<(), CoreError> {
    require_non_blank("title", &contract.title)
}

impl NocesService {
    pub async fn create_contract(&self, input: NewContract) -> Result<Contract, DatabaseError> {
        require_non_blank("title", &input.title)?;
        require_non_blank("client_id", &input.client_id)?;
        let mut body = to_body(&input)?;
        body.insert("status".into(), serde_json::to_value(ContractStatus::Draft)?);
        self.create_entity(Value::Object(body)).await
    }

    pub async fn get_contract(&self, id: &str) -> Result<Contract, DatabaseError> {
        self.get_entity(id).await
    }

    pub async fn list_contracts(&self, query: &Query) -> Result<Vec<Contract>, DatabaseError> {
        self.list_entities(query).await
    }

    pub async fn update_contract(
        &self,
        id: &str,
        update: ContractUpdate,
    ) -> Result<Contract, DatabaseError> {
        self.patch_entity(id, to_patch(&update)?, validate_contract)
            .await
    }

    pub async fn delete_contract(&self, id: &str) -> Result<(), DatabaseError> {
        self.delete_entity::<Contract>(id).await
    }

    pub async fn transition_contract(
        &self,
        id: &str,
        status: ContractStatus,
    ) -> Result<Contract, DatabaseError> {
        self.modify_entity(id, |contract: &mut Contract| {
            if !contract.status.can_transition_to(status) {
                return Err(invalid_transition(Contract::NAME, id, contract.status, status));
            }
            contract.status = status;
            Ok(())
        })
        .await
    }

    /// Record the envelope a contract was sent in; the contract becomes `sent`.
    pub async fn attach_contract_signature(
        &self,
        id: &str,
        signature: SignatureTracking,
    ) -> Result<Contract, DatabaseError> {
        self.modify_entity(id, |contract: &mut Contract| {
            if contract.status != ContractStatus::Sent {
                if !contract.status.can_transition_to(ContractStatus::Sent) {
                    return Err(invalid_transition(
                        Contract::NAME,
                        id,
                        contract.status,
                        ContractStatus::Sent,
                    ));
                }
                contract.status = ContractStatus::Sent;
            }
            contract.signature = Some(signature);
            Ok(())
        })
        .await
    }

    /// Write the signature state computed from the contract's envelope.
    pub async fn apply_contract_signature(
        &self,
        id: &str,
        patch: &ContractSignaturePatch,
    ) -> Result<Contract, DatabaseError> {
        self.modify_entity(id, |contract: &mut Contract| {
            contract.signature = Some(patch.signature.clone());
            contract.status = patch.status;
            Ok(())
        })
        .await
    }

    /// Sent or partially signed contracts with an envelope to poll.
    pub async fn list_contracts_awaiting_signature(&self) -> Result<Vec<Contract>, DatabaseError> {
        let query = Query::new()
            .where_op("status", FilterOp::In, json!(["sent", "partially_signed"]))
            .where_op("signature.envelope_id", FilterOp::NotEq, Value::Null);
        self.list_contracts(&query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_service;
    use noces_core::entities::Signer;
    use noces_core::enums::{EnvelopeStatus, RecipientStatus};

    fn new_contract() -> NewContract {
        NewContract {
            client_id: "cli-1".into(),
            title: "Contrat de prestation".into(),
            pdf_url: Some("https://res.cloudinary.com/demo/contract.pdf".into()),
        }
    }

    fn signature(status: EnvelopeStatus, signed: bool) -> SignatureTracking {
        SignatureTracking {
            envelope_id: "env-42".into(),
            envelope_status: status,
            signers: vec![Signer {
                name: "Alex".into(),
                email: "alex@example.com".into(),
                status: if signed {
                    RecipientStatus::Completed
                } else {
                    RecipientStatus::Sent
                },
                signed_at: None,
            }],
            sent_at: None,
            completed_at: None,
            signed_pdf_url: None,
        }
    }

    #[tokio::test]
    async fn attach_and_track_signature() {
        let svc = test_service().await;
        let contract = svc.create_contract(new_contract()).await.unwrap();
        assert_eq!(contract.status, ContractStatus::Draft);

        let sent = svc
            .attach_contract_signature(&contract.id, signature(EnvelopeStatus::Sent, false))
            .await
            .unwrap();
        assert_eq!(sent.status, ContractStatus::Sent);
        assert_eq!(svc.list_contracts_awaiting_signature().await.unwrap().len(), 1);

        let patch = ContractSignaturePatch {
            signature: signature(EnvelopeStatus::Completed, true),
            status: ContractStatus::Signed,
        };
        let signed = svc.apply_contract_signature(&contract.id, &patch).await.unwrap();
        assert_eq!(signed.status, ContractStatus::Signed);
        assert_eq!(signed.signature.unwrap().signed_count(), 1);
        assert!(svc.list_contracts_awaiting_signature().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn signed_contract_cannot_be_resent() {
        let svc = test_service().await;
        let contract = svc.create_contract(new_contract()).await.unwrap();
        svc.transition_contract(&contract.id, ContractStatus::Sent)
            .await
            .unwrap();
        svc.transition_contract(&contract.id, ContractStatus::Signed)
            .await
            .unwrap();

        let err = svc
            .attach_contract_signature(&contract.id, signature(EnvelopeStatus::Sent, false))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn voided_contract_returns_to_draft() {
        let svc = test_service().await;
        let contract = svc.create_contract(new_contract()).await.unwrap();
        svc.transition_contract(&contract.id, ContractStatus::Sent)
            .await
            .unwrap();
        svc.transition_contract(&contract.id, ContractStatus::Voided)
            .await
            .unwrap();
        let draft = svc
            .transition_contract(&contract.id, ContractStatus::Draft)
            .await
            .unwrap();
        assert_eq!(draft.status, ContractStatus::Draft);
    }

    #[tokio::test]
    async fn update_contract_title() {
        let svc = test_service().await;
        let contract = svc.create_contract(new_contract()).await.unwrap();
        let updated = svc
            .update_contract(
                &contract.id,
                ContractUpdate {
                    title: Some("Contrat signé".into()),
                    ..ContractUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Contrat signé");
        assert_eq!(updated.pdf_url, contract.pdf_url);
    }
}
