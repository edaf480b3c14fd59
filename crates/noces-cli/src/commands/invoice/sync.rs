use chrono::Utc;
use noces_core::entities::Invoice;
use noces_core::responses::SyncReport;
use noces_integrations::qonto::{QontoClient, reconcile_invoice_payment};

use crate::cli::GlobalFlags;
use crate::commands::shared::clients::qonto_client;
use crate::context::AppContext;
use crate::output::output;

/// Reconcile invoices with their Qonto payment links: one invoice, or every
/// invoice awaiting payment. Failures are counted and the batch continues.
pub async fn run(id: Option<&str>, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let invoices = match id {
        Some(id) => vec![ctx.service.get_invoice(id).await?],
        None => ctx.service.list_invoices_awaiting_payment().await?,
    };
    if invoices.is_empty() {
        return output(&SyncReport::default(), flags.format);
    }

    let qonto = qonto_client(ctx).await?;
    let mut report = SyncReport::default();
    for invoice in &invoices {
        match sync_invoice(&qonto, ctx, invoice).await {
            Ok(true) => report.record_updated(),
            Ok(false) => report.record_unchanged(),
            Err(error) => {
                let error = format!("{error:#}");
                tracing::warn!(invoice_id = %invoice.id, %error, "payment sync failed");
                report.record_failure(&invoice.id, error);
            }
        }
    }
    output(&report, flags.format)
}

async fn sync_invoice(qonto: &QontoClient, ctx: &AppContext, invoice: &Invoice) -> anyhow::Result<bool> {
    let link_id = invoice
        .qonto_payment_link_id
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("invoice has no payment link; run 'noces invoice send'"))?;
    let link = qonto.get_payment_link(link_id).await?;
    let payments = qonto.list_payment_link_payments(link_id).await?;

    let Some(patch) = reconcile_invoice_payment(invoice, &link, &payments, Utc::now())? else {
        return Ok(false);
    };
    ctx.service
        .apply_payment_reconciliation(&invoice.id, &patch)
        .await?;
    tracing::debug!(invoice_id = %invoice.id, status = %patch.status, paid_cents = patch.paid_cents, "invoice reconciled");
    Ok(true)
}
