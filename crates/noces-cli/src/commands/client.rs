use noces_core::collections::Collection;
use noces_core::enums::ClientStatus;
use noces_db::updates::client::{ClientUpdate, NewClient};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ClientCommands;
use crate::cli::subcommands::client::{ClientCreateArgs, ClientUpdateArgs};
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{
    build_query, clearable, clearable_text, parse_amount, parse_date, parse_enum, require_changes,
};
use crate::commands::shared::responses::Deleted;
use crate::context::AppContext;
use crate::output::output;

/// Handle `noces client`.
pub async fn handle(
    action: &ClientCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ClientCommands::Create(args) => {
            let client = ctx.service.create_client(new_client(args)?).await?;
            output(&client, flags.format)
        }
        ClientCommands::Get(args) => output(&ctx.service.get_client(&args.id).await?, flags.format),
        ClientCommands::List(list) => {
            let limit = effective_limit(flags.limit, ctx.config.general.default_limit);
            let clients = ctx.service.list_clients(&build_query(list, limit)?).await?;
            output(&clients, flags.format)
        }
        ClientCommands::Update(args) => {
            let client = ctx
                .service
                .update_client(&args.id, client_update(args)?)
                .await?;
            output(&client, flags.format)
        }
        ClientCommands::Delete(args) => {
            ctx.service.delete_client(&args.id).await?;
            output(&Deleted::new(Collection::Clients, &args.id), flags.format)
        }
        ClientCommands::Status { id, status } => {
            let status = parse_enum::<ClientStatus>(status, "status")?;
            output(&ctx.service.transition_client(id, status).await?, flags.format)
        }
    }
}

fn new_client(args: &ClientCreateArgs) -> anyhow::Result<NewClient> {
    Ok(NewClient {
        name: args.name.clone(),
        partner_name: args.partner.clone(),
        email: args.email.clone(),
        phone: args.phone.clone(),
        address: args.address.clone(),
        wedding_date: args.wedding_date,
        budget_cents: args
            .budget
            .as_deref()
            .map(|raw| parse_amount(raw, "budget"))
            .transpose()?,
        status: args
            .status
            .as_deref()
            .map(|raw| parse_enum::<ClientStatus>(raw, "status"))
            .transpose()?,
        notes: args.notes.clone(),
        portal_email: args.portal_email.clone(),
    })
}

fn client_update(args: &ClientUpdateArgs) -> anyhow::Result<ClientUpdate> {
    let update = ClientUpdate {
        name: args.name.clone(),
        partner_name: clearable_text(args.partner.as_deref()),
        email: clearable_text(args.email.as_deref()),
        phone: clearable_text(args.phone.as_deref()),
        address: clearable_text(args.address.as_deref()),
        wedding_date: clearable(args.wedding_date.as_deref(), |raw| {
            parse_date(raw, "wedding date")
        })?,
        budget_cents: clearable(args.budget.as_deref(), |raw| parse_amount(raw, "budget"))?,
        notes: clearable_text(args.notes.as_deref()),
        portal_email: clearable_text(args.portal_email.as_deref()),
    };
    require_changes(
        &update,
        "--name, --partner, --email, --phone, --address, --wedding-date, --budget, --notes or --portal-email",
    )?;
    Ok(update)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn update_args() -> ClientUpdateArgs {
        ClientUpdateArgs {
            id: "cli-1".into(),
            name: None,
            partner: None,
            email: None,
            phone: None,
            address: None,
            wedding_date: None,
            budget: None,
            notes: None,
            portal_email: None,
        }
    }

    #[test]
    fn rejects_noop_update() {
        assert!(client_update(&update_args()).is_err());
    }

    #[test]
    fn empty_flag_clears_field() {
        let args = ClientUpdateArgs {
            phone: Some(String::new()),
            wedding_date: Some("2027-06-12".into()),
            ..update_args()
        };
        let update = client_update(&args).expect("update should build");
        assert_eq!(update.phone, Some(None));
        assert_eq!(
            update.wedding_date,
            Some(NaiveDate::from_ymd_opt(2027, 6, 12))
        );
        assert!(update.email.is_none());
    }

    #[test]
    fn create_parses_budget_and_status() {
        let args = ClientCreateArgs {
            name: "Camille & Lou".into(),
            partner: None,
            email: None,
            phone: None,
            address: None,
            wedding_date: None,
            budget: Some("25 000".into()),
            status: Some("active".into()),
            notes: None,
            portal_email: None,
        };
        let client = new_client(&args).expect("client should build");
        assert_eq!(client.budget_cents, Some(2_500_000));
        assert_eq!(client.status, Some(ClientStatus::Active));
    }
}
