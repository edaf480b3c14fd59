use anyhow::Context;
use chrono::Utc;
use noces_core::entities::{SignatureTracking, Signer};
use noces_core::enums::RecipientStatus;
use noces_integrations::docusign::NewEnvelope;

use super::Signable;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::devis::SendForSignatureArgs;
use crate::commands::shared::clients::docusign_client;
use crate::commands::shared::signers::resolve_signers;
use crate::context::AppContext;
use crate::output::output;

/// Send a devis or contract PDF for signature and record the envelope.
pub async fn run<T: Signable>(
    args: &SendForSignatureArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let document = T::load(ctx, &args.id).await?;
    if let Some(signature) = document.signature()
        && !signature.envelope_status.is_terminal()
    {
        anyhow::bail!(
            "{} is already out for signature in envelope {}; run sync or void it first",
            args.id,
            signature.envelope_id
        );
    }

    let client = ctx.service.get_client(document.client_id()).await?;
    let signers = resolve_signers(&args.signers, &client)?;
    let pdf = std::fs::read(&args.pdf)
        .with_context(|| format!("failed to read {}", args.pdf.display()))?;

    let docusign = docusign_client(ctx).await?;
    let summary = docusign
        .create_envelope(&NewEnvelope {
            email_subject: args.subject.clone().unwrap_or_else(|| document.email_subject()),
            document_name: document.document_name(),
            pdf,
            signers: signers.clone(),
        })
        .await?;
    tracing::debug!(id = %args.id, envelope_id = %summary.envelope_id, "envelope sent");

    let tracking = SignatureTracking {
        envelope_id: summary.envelope_id,
        envelope_status: summary.status,
        signers: signers
            .into_iter()
            .map(|signer| Signer {
                name: signer.name,
                email: signer.email,
                status: RecipientStatus::Sent,
                signed_at: None,
            })
            .collect(),
        sent_at: Some(Utc::now()),
        completed_at: None,
        signed_pdf_url: None,
    };
    let document = T::attach(ctx, &args.id, tracking).await?;
    output(&document, flags.format)
}
