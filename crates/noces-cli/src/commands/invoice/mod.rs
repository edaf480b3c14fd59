mod send;
mod sync;

use noces_core::collections::Collection;
use noces_core::enums::InvoiceStatus;
use noces_db::updates::invoice::{InvoiceUpdate, InvoiceUpdateBuilder, NewInvoice};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::InvoiceCommands;
use crate::cli::subcommands::invoice::{InvoiceCreateArgs, InvoiceUpdateArgs};
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{
    build_query, clearable, clearable_text, parse_amount, parse_date, parse_enum,
    parse_line_items, require_changes,
};
use crate::commands::shared::responses::Deleted;
use crate::context::AppContext;
use crate::output::output;

/// Handle `noces invoice`.
pub async fn handle(
    action: &InvoiceCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        InvoiceCommands::Create(args) => {
            output(&ctx.service.create_invoice(new_invoice(args)?).await?, flags.format)
        }
        InvoiceCommands::Get(args) => {
            output(&ctx.service.get_invoice(&args.id).await?, flags.format)
        }
        InvoiceCommands::List(list) => {
            let limit = effective_limit(flags.limit, ctx.config.general.default_limit);
            output(&ctx.service.list_invoices(&build_query(list, limit)?).await?, flags.format)
        }
        InvoiceCommands::Update(args) => {
            let invoice = ctx
                .service
                .update_invoice(&args.id, invoice_update(args)?)
                .await?;
            output(&invoice, flags.format)
        }
        InvoiceCommands::Delete(args) => {
            ctx.service.delete_invoice(&args.id).await?;
            output(&Deleted::new(Collection::Invoices, &args.id), flags.format)
        }
        InvoiceCommands::Status { id, status } => {
            let status = parse_enum::<InvoiceStatus>(status, "status")?;
            let mut invoice = ctx.service.transition_invoice(id, status).await?;
            if status == InvoiceStatus::Cancelled {
                invoice = send::deactivate_open_link(invoice, ctx).await?;
            }
            output(&invoice, flags.format)
        }
        InvoiceCommands::Pay { id, amount } => {
            let amount_cents = parse_amount(amount, "amount")?;
            output(&ctx.service.record_payment(id, amount_cents).await?, flags.format)
        }
        InvoiceCommands::Send(args) => send::run(&args.id, ctx, flags).await,
        InvoiceCommands::Sync { id } => sync::run(id.as_deref(), ctx, flags).await,
    }
}

fn new_invoice(args: &InvoiceCreateArgs) -> anyhow::Result<NewInvoice> {
    Ok(NewInvoice {
        client_id: args.client.clone(),
        number: args.number.clone(),
        items: parse_line_items(&args.items)?,
        total_cents: args
            .total
            .as_deref()
            .map(|raw| parse_amount(raw, "total"))
            .transpose()?,
        due_date: args.due,
    })
}

/// `--item` replaces the whole item list when given.
fn invoice_update(args: &InvoiceUpdateArgs) -> anyhow::Result<InvoiceUpdate> {
    let mut builder = InvoiceUpdateBuilder::new();
    if let Some(number) = args.number.as_deref() {
        builder = builder.number(number);
    }
    if !args.items.is_empty() {
        builder = builder.items(parse_line_items(&args.items)?);
    }
    if let Some(total) = args.total.as_deref() {
        builder = builder.total_cents(parse_amount(total, "total")?);
    }
    if let Some(due) = clearable(args.due.as_deref(), |raw| parse_date(raw, "due date"))? {
        builder = builder.due_date(due);
    }
    if let Some(pdf_url) = clearable_text(args.pdf_url.as_deref()) {
        builder = builder.pdf_url(pdf_url);
    }

    let update = builder.build();
    require_changes(&update, "--number, --item, --total, --due or --pdf-url")?;
    Ok(update)
}

#[cfg(test)]
mod tests {
    use noces_core::entities::LineItem;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn create_parses_items_and_total() {
        let invoice = new_invoice(&InvoiceCreateArgs {
            client: "cli-1".into(),
            number: "F-2026-014".into(),
            items: vec!["Coordination jour J:1:1800".into(), "Déplacement:2:45,50".into()],
            total: None,
            due: None,
        })
        .expect("invoice should build");
        assert_eq!(
            invoice.items,
            vec![
                LineItem {
                    label: "Coordination jour J".into(),
                    quantity: 1,
                    unit_price_cents: 180_000,
                },
                LineItem {
                    label: "Déplacement".into(),
                    quantity: 2,
                    unit_price_cents: 4550,
                },
            ]
        );
        assert_eq!(invoice.total_cents, None);
    }

    #[test]
    fn update_without_items_keeps_them() {
        let update = invoice_update(&InvoiceUpdateArgs {
            id: "inv-1".into(),
            number: None,
            items: Vec::new(),
            total: None,
            due: Some(String::new()),
            pdf_url: None,
        })
        .expect("update should build");
        assert!(update.items.is_none());
        assert_eq!(update.due_date, Some(None));
    }
}
