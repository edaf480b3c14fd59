use noces_core::collections::Collection;
use noces_db::repos::expenses::ExpenseScope;
use noces_db::updates::expense::{ExpenseUpdate, NewExpense};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ExpenseCommands;
use crate::cli::subcommands::expense::{ExpenseCreateArgs, ExpenseTotalArgs, ExpenseUpdateArgs};
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{
    build_query, clearable, clearable_text, parse_amount, parse_date, require_changes,
};
use crate::commands::shared::responses::Deleted;
use crate::context::AppContext;
use crate::output::output;

/// Handle `noces expense`.
pub async fn handle(
    action: &ExpenseCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ExpenseCommands::Create(args) => {
            output(&ctx.service.create_expense(new_expense(args)?).await?, flags.format)
        }
        ExpenseCommands::Get(args) => {
            output(&ctx.service.get_expense(&args.id).await?, flags.format)
        }
        ExpenseCommands::List(list) => {
            let limit = effective_limit(flags.limit, ctx.config.general.default_limit);
            output(&ctx.service.list_expenses(&build_query(list, limit)?).await?, flags.format)
        }
        ExpenseCommands::Update(args) => {
            let expense = ctx
                .service
                .update_expense(&args.id, expense_update(args)?)
                .await?;
            output(&expense, flags.format)
        }
        ExpenseCommands::Delete(args) => {
            ctx.service.delete_expense(&args.id).await?;
            output(&Deleted::new(Collection::Expenses, &args.id), flags.format)
        }
        ExpenseCommands::Total(args) => {
            output(&ctx.service.expense_total(total_scope(args)?).await?, flags.format)
        }
    }
}

fn new_expense(args: &ExpenseCreateArgs) -> anyhow::Result<NewExpense> {
    Ok(NewExpense {
        label: args.label.clone(),
        category: args.category.clone(),
        amount_cents: parse_amount(&args.amount, "amount")?,
        date: args.date,
        client_id: args.client.clone(),
        event_id: args.event.clone(),
        vendor_id: args.vendor.clone(),
        paid: args.paid,
    })
}

fn expense_update(args: &ExpenseUpdateArgs) -> anyhow::Result<ExpenseUpdate> {
    let update = ExpenseUpdate {
        label: args.label.clone(),
        category: clearable_text(args.category.as_deref()),
        amount_cents: args
            .amount
            .as_deref()
            .map(|raw| parse_amount(raw, "amount"))
            .transpose()?,
        date: clearable(args.date.as_deref(), |raw| parse_date(raw, "date"))?,
        client_id: clearable_text(args.client.as_deref()),
        event_id: clearable_text(args.event.as_deref()),
        vendor_id: clearable_text(args.vendor.as_deref()),
        paid: args.paid,
    };
    require_changes(
        &update,
        "--label, --amount, --category, --date, --client, --event, --vendor or --paid",
    )?;
    Ok(update)
}

fn total_scope(args: &ExpenseTotalArgs) -> anyhow::Result<ExpenseScope<'_>> {
    match (args.event.as_deref(), args.client.as_deref()) {
        (Some(event), None) => Ok(ExpenseScope::Event(event)),
        (None, Some(client)) => Ok(ExpenseScope::Client(client)),
        _ => anyhow::bail!("expense total needs exactly one of --event or --client"),
    }
}
