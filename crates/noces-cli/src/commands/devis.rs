use noces_core::collections::Collection;
use noces_core::entities::Devis;
use noces_core::enums::DevisStatus;
use noces_db::updates::devis::{DevisUpdate, NewDevis};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::DevisCommands;
use crate::cli::subcommands::devis::{DevisCreateArgs, DevisUpdateArgs};
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{
    build_query, clearable, clearable_text, parse_amount, parse_date, parse_line_items,
    require_changes,
};
use crate::commands::shared::responses::Deleted;
use crate::commands::signature;
use crate::context::AppContext;
use crate::output::output;

/// Handle `noces devis`.
pub async fn handle(action: &DevisCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        DevisCommands::Create(args) => {
            output(&ctx.service.create_devis(new_devis(args)?).await?, flags.format)
        }
        DevisCommands::Get(args) => output(&ctx.service.get_devis(&args.id).await?, flags.format),
        DevisCommands::List(list) => {
            let limit = effective_limit(flags.limit, ctx.config.general.default_limit);
            output(&ctx.service.list_devis(&build_query(list, limit)?).await?, flags.format)
        }
        DevisCommands::Update(args) => {
            output(&ctx.service.update_devis(&args.id, devis_update(args)?).await?, flags.format)
        }
        DevisCommands::Delete(args) => {
            ctx.service.delete_devis(&args.id).await?;
            output(&Deleted::new(Collection::Devis, &args.id), flags.format)
        }
        DevisCommands::Accept(args) => {
            let devis = ctx.service.transition_devis(&args.id, DevisStatus::Accepted).await?;
            output(&devis, flags.format)
        }
        DevisCommands::Reject(args) => {
            let devis = ctx.service.transition_devis(&args.id, DevisStatus::Rejected).await?;
            output(&devis, flags.format)
        }
        DevisCommands::Convert { id, number } => {
            let conversion = ctx
                .service
                .convert_devis_to_invoice(id, number.as_deref())
                .await?;
            output(&conversion, flags.format)
        }
        DevisCommands::Send(args) => signature::send::run::<Devis>(args, ctx, flags).await,
        DevisCommands::Sync { id } => signature::sync::run::<Devis>(id.as_deref(), ctx, flags).await,
    }
}

fn new_devis(args: &DevisCreateArgs) -> anyhow::Result<NewDevis> {
    Ok(NewDevis {
        client_id: args.client.clone(),
        number: args.number.clone(),
        items: parse_line_items(&args.items)?,
        total_cents: args
            .total
            .as_deref()
            .map(|raw| parse_amount(raw, "total"))
            .transpose()?,
        valid_until: args.valid_until,
    })
}

fn devis_update(args: &DevisUpdateArgs) -> anyhow::Result<DevisUpdate> {
    let update = DevisUpdate {
        number: args.number.clone(),
        items: if args.items.is_empty() {
            None
        } else {
            Some(parse_line_items(&args.items)?)
        },
        total_cents: args
            .total
            .as_deref()
            .map(|raw| parse_amount(raw, "total"))
            .transpose()?,
        valid_until: clearable(args.valid_until.as_deref(), |raw| parse_date(raw, "valid until"))?,
        pdf_url: clearable_text(args.pdf_url.as_deref()),
    };
    require_changes(
        &update,
        "--number, --item, --total, --valid-until or --pdf-url",
    )?;
    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_overrides_items() {
        let devis = new_devis(&DevisCreateArgs {
            client: "cli-1".into(),
            number: "D-2026-007".into(),
            items: vec!["Décoration:1:2400".into()],
            total: Some("2 200".into()),
            valid_until: None,
        })
        .expect("devis should build");
        assert_eq!(devis.items.len(), 1);
        assert_eq!(devis.total_cents, Some(220_000));
    }

    #[test]
    fn update_rejects_malformed_item() {
        let err = devis_update(&DevisUpdateArgs {
            id: "dev-1".into(),
            number: None,
            items: vec!["Décoration".into()],
            total: None,
            valid_until: None,
            pdf_url: None,
        })
        .expect_err("should fail");
        assert!(err.to_string().contains("invalid item"));
    }
}
