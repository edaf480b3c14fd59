use noces_core::entities::SignatureTracking;
use noces_core::enums::EnvelopeStatus;
use noces_core::responses::SyncReport;
use noces_core::sync::SignaturePatch;
use noces_integrations::cloudinary::CloudinaryClient;
use noces_integrations::docusign::DocuSignClient;

use super::Signable;
use crate::cli::GlobalFlags;
use crate::commands::shared::clients::{docusign_client, optional_cloudinary};
use crate::context::AppContext;
use crate::output::output;

/// Reconcile devis or contracts with their DocuSign envelopes: one
/// document, or every document awaiting signature. Failures are counted and
/// the batch continues.
pub async fn run<T: Signable>(
    id: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let documents = match id {
        Some(id) => vec![T::load(ctx, id).await?],
        None => T::awaiting(ctx).await?,
    };
    if documents.is_empty() {
        return output(&SyncReport::default(), flags.format);
    }

    let docusign = docusign_client(ctx).await?;
    let cloudinary = optional_cloudinary(ctx)?;
    let mut report = SyncReport::default();
    for document in &documents {
        match sync_document(&docusign, cloudinary.as_ref(), ctx, document).await {
            Ok(true) => report.record_updated(),
            Ok(false) => report.record_unchanged(),
            Err(error) => {
                let error = format!("{error:#}");
                tracing::warn!(id = %document.id(), %error, "signature sync failed");
                report.record_failure(document.id(), error);
            }
        }
    }
    output(&report, flags.format)
}

async fn sync_document<T: Signable>(
    docusign: &DocuSignClient,
    cloudinary: Option<&CloudinaryClient>,
    ctx: &AppContext,
    document: &T,
) -> anyhow::Result<bool> {
    let envelope_id = document
        .signature()
        .map(|signature| signature.envelope_id.as_str())
        .ok_or_else(|| anyhow::anyhow!("not sent for signature"))?;
    let envelope = docusign.get_envelope(envelope_id).await?;
    let recipients = docusign.list_recipients(envelope_id).await?;

    let (mut patch, changed) = match document.reconcile(&envelope, &recipients) {
        Some(patch) => (patch, true),
        None => match document.signature() {
            // Completed earlier but the signed copy was never archived.
            Some(signature) if needs_archive(signature) && cloudinary.is_some() => (
                SignaturePatch {
                    signature: signature.clone(),
                    status: document.status(),
                },
                false,
            ),
            _ => return Ok(false),
        },
    };

    let archived = match cloudinary {
        Some(cloudinary) if needs_archive(&patch.signature) => {
            archive_signed_pdf(docusign, cloudinary, &mut patch.signature, document.id()).await
        }
        _ => false,
    };
    if !changed && !archived {
        return Ok(false);
    }

    T::apply(ctx, document.id(), &patch).await?;
    Ok(true)
}

fn needs_archive(signature: &SignatureTracking) -> bool {
    signature.envelope_status == EnvelopeStatus::Completed && signature.signed_pdf_url.is_none()
}

/// Copy the signed PDF to Cloudinary. Failures are logged; the signature
/// state is still written and the copy is retried on the next sync.
async fn archive_signed_pdf(
    docusign: &DocuSignClient,
    cloudinary: &CloudinaryClient,
    signature: &mut SignatureTracking,
    document_id: &str,
) -> bool {
    let public_id = format!("{document_id}-signed");
    let uploaded = match docusign.download_combined_pdf(&signature.envelope_id).await {
        Ok(pdf) => cloudinary.upload_pdf(&pdf, Some(&public_id)).await,
        Err(error) => Err(error),
    };
    match uploaded {
        Ok(file) => {
            tracing::debug!(id = %document_id, url = %file.secure_url, "signed PDF archived");
            signature.signed_pdf_url = Some(file.secure_url);
            true
        }
        Err(error) => {
            tracing::warn!(id = %document_id, %error, "failed to archive signed PDF");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use noces_core::enums::EnvelopeStatus;

    use super::*;

    fn signature(status: EnvelopeStatus, url: Option<&str>) -> SignatureTracking {
        SignatureTracking {
            envelope_id: "env-1".into(),
            envelope_status: status,
            signers: Vec::new(),
            sent_at: None,
            completed_at: None,
            signed_pdf_url: url.map(str::to_string),
        }
    }

    #[test]
    fn only_completed_unarchived_envelopes_need_archive() {
        assert!(needs_archive(&signature(EnvelopeStatus::Completed, None)));
        assert!(!needs_archive(&signature(
            EnvelopeStatus::Completed,
            Some("https://res.cloudinary.com/demo/signed.pdf")
        )));
        assert!(!needs_archive(&signature(EnvelopeStatus::Sent, None)));
    }
}
