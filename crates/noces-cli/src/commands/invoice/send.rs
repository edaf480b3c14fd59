use anyhow::Context;
use noces_core::entities::Invoice;
use noces_core::enums::{InvoiceStatus, PaymentLinkStatus};
use noces_integrations::qonto::{NewPaymentLink, PaymentMethod};

use crate::cli::GlobalFlags;
use crate::commands::shared::clients::qonto_client;
use crate::context::AppContext;
use crate::output::output;

/// Create a Qonto payment link for the remaining amount and mark a draft
/// invoice as sent.
pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let invoice = ctx.service.get_invoice(id).await?;
    if matches!(invoice.status, InvoiceStatus::Paid | InvoiceStatus::Cancelled) {
        anyhow::bail!("invoice {id} is {}, nothing to collect", invoice.status);
    }
    if invoice.payment_link_status == Some(PaymentLinkStatus::Open)
        && let Some(url) = invoice.payment_link_url.as_deref()
    {
        anyhow::bail!("invoice {id} already has an open payment link: {url}");
    }
    let remaining = invoice.remaining_cents();
    if remaining <= 0 {
        anyhow::bail!("invoice {id} has nothing left to pay");
    }

    let client = ctx.service.get_client(&invoice.client_id).await?;
    let qonto = qonto_client(ctx).await?;
    let link = qonto
        .create_payment_link(&NewPaymentLink {
            amount_cents: remaining,
            currency: ctx.config.general.currency.clone(),
            invoice_id: invoice.id.clone(),
            invoice_number: invoice.number.clone(),
            debitor_name: client.name,
            payment_methods: PaymentMethod::DEFAULT.to_vec(),
        })
        .await?;
    let url = link
        .url
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("Qonto returned payment link {} without a URL", link.id))?;
    tracing::debug!(invoice_id = %invoice.id, link_id = %link.id, "payment link created");

    let mut invoice = ctx
        .service
        .attach_payment_link(&invoice.id, &link.id, url, Some(link.status))
        .await?;
    if invoice.status == InvoiceStatus::Draft {
        invoice = ctx
            .service
            .transition_invoice(&invoice.id, InvoiceStatus::Sent)
            .await?;
    }
    output(&invoice, flags.format)
}

/// Deactivate the open Qonto link of a cancelled invoice.
pub async fn deactivate_open_link(invoice: Invoice, ctx: &AppContext) -> anyhow::Result<Invoice> {
    let (Some(PaymentLinkStatus::Open), Some(link_id), Some(url)) = (
        invoice.payment_link_status,
        invoice.qonto_payment_link_id.as_deref(),
        invoice.payment_link_url.as_deref(),
    ) else {
        return Ok(invoice);
    };

    let qonto = qonto_client(ctx).await?;
    let link = qonto
        .deactivate_payment_link(link_id)
        .await
        .with_context(|| format!("invoice {} is cancelled but its payment link is still open", invoice.id))?;
    tracing::debug!(invoice_id = %invoice.id, link_id = %link.id, status = %link.status, "payment link deactivated");

    Ok(ctx
        .service
        .attach_payment_link(&invoice.id, &link.id, url, Some(link.status))
        .await?)
}
