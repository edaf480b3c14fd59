//! DocuSign signature flows shared by devis and contracts.

pub mod send;
pub mod sync;

use noces_core::entities::{Contract, Devis, SignatureTracking};
use noces_core::enums::{ContractStatus, DevisStatus};
use noces_core::sync::SignaturePatch;
use noces_integrations::docusign::{
    Envelope, Recipient, reconcile_contract_signature, reconcile_devis_signature,
};
use serde::Serialize;

use crate::context::AppContext;

/// A document sent to the client for signature.
pub(crate) trait Signable: Serialize + Sized {
    type Status: Copy;

    fn id(&self) -> &str;
    fn client_id(&self) -> &str;
    fn status(&self) -> Self::Status;
    fn signature(&self) -> Option<&SignatureTracking>;
    fn email_subject(&self) -> String;
    fn document_name(&self) -> String;
    fn reconcile(
        &self,
        envelope: &Envelope,
        recipients: &[Recipient],
    ) -> Option<SignaturePatch<Self::Status>>;

    async fn load(ctx: &AppContext, id: &str) -> anyhow::Result<Self>;
    async fn awaiting(ctx: &AppContext) -> anyhow::Result<Vec<Self>>;
    async fn attach(ctx: &AppContext, id: &str, signature: SignatureTracking) -> anyhow::Result<Self>;
    async fn apply(
        ctx: &AppContext,
        id: &str,
        patch: &SignaturePatch<Self::Status>,
    ) -> anyhow::Result<Self>;
}

impl Signable for Devis {
    type Status = DevisStatus;

    fn id(&self) -> &str {
        &self.id
    }

    fn client_id(&self) -> &str {
        &self.client_id
    }

    fn status(&self) -> DevisStatus {
        self.status
    }

    fn signature(&self) -> Option<&SignatureTracking> {
        self.signature.as_ref()
    }

    fn email_subject(&self) -> String {
        format!("Devis {} à signer", self.number)
    }

    fn document_name(&self) -> String {
        format!("devis-{}.pdf", self.number)
    }

    fn reconcile(
        &self,
        envelope: &Envelope,
        recipients: &[Recipient],
    ) -> Option<SignaturePatch<DevisStatus>> {
        reconcile_devis_signature(self, envelope, recipients)
    }

    async fn load(ctx: &AppContext, id: &str) -> anyhow::Result<Self> {
        Ok(ctx.service.get_devis(id).await?)
    }

    async fn awaiting(ctx: &AppContext) -> anyhow::Result<Vec<Self>> {
        Ok(ctx.service.list_devis_awaiting_signature().await?)
    }

    async fn attach(ctx: &AppContext, id: &str, signature: SignatureTracking) -> anyhow::Result<Self> {
        Ok(ctx.service.attach_devis_signature(id, signature).await?)
    }

    async fn apply(
        ctx: &AppContext,
        id: &str,
        patch: &SignaturePatch<DevisStatus>,
    ) -> anyhow::Result<Self> {
        Ok(ctx.service.apply_devis_signature(id, patch).await?)
    }
}

impl Signable for Contract {
    type Status = ContractStatus;

    fn id(&self) -> &str {
        &self.id
    }

    fn client_id(&self) -> &str {
        &self.client_id
    }

    fn status(&self) -> ContractStatus {
        self.status
    }

    fn signature(&self) -> Option<&SignatureTracking> {
        self.signature.as_ref()
    }

    fn email_subject(&self) -> String {
        format!("Contrat à signer : {}", self.title)
    }

    fn document_name(&self) -> String {
        format!("contrat-{}.pdf", self.id)
    }

    fn reconcile(
        &self,
        envelope: &Envelope,
        recipients: &[Recipient],
    ) -> Option<SignaturePatch<ContractStatus>> {
        reconcile_contract_signature(self, envelope, recipients)
    }

    async fn load(ctx: &AppContext, id: &str) -> anyhow::Result<Self> {
        Ok(ctx.service.get_contract(id).await?)
    }

    async fn awaiting(ctx: &AppContext) -> anyhow::Result<Vec<Self>> {
        Ok(ctx.service.list_contracts_awaiting_signature().await?)
    }

    async fn attach(ctx: &AppContext, id: &str, signature: SignatureTracking) -> anyhow::Result<Self> {
        Ok(ctx.service.attach_contract_signature(id, signature).await?)
    }

    async fn apply(
        ctx: &AppContext,
        id: &str,
        patch: &SignaturePatch<ContractStatus>,
    ) -> anyhow::Result<Self> {
        Ok(ctx.service.apply_contract_signature(id, patch).await?)
    }
}
