use noces_core::collections::Collection;
use noces_core::entities::Contract;
use noces_core::enums::ContractStatus;
use noces_db::updates::contract::{ContractUpdate, NewContract};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ContractCommands;
use crate::commands::shared::clients::docusign_client;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{build_query, clearable_text, require_changes};
use crate::commands::shared::responses::Deleted;
use crate::commands::signature;
use crate::context::AppContext;
use crate::output::output;

/// Handle `noces contract`.
pub async fn handle(
    action: &ContractCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ContractCommands::Create(args) => {
            let contract = ctx
                .service
                .create_contract(NewContract {
                    client_id: args.client.clone(),
                    title: args.title.clone(),
                    pdf_url: args.pdf_url.clone(),
                })
                .await?;
            output(&contract, flags.format)
        }
        ContractCommands::Get(args) => {
            output(&ctx.service.get_contract(&args.id).await?, flags.format)
        }
        ContractCommands::List(list) => {
            let limit = effective_limit(flags.limit, ctx.config.general.default_limit);
            output(&ctx.service.list_contracts(&build_query(list, limit)?).await?, flags.format)
        }
        ContractCommands::Update(args) => {
            let update = ContractUpdate {
                title: args.title.clone(),
                pdf_url: clearable_text(args.pdf_url.as_deref()),
            };
            require_changes(&update, "--title or --pdf-url")?;
            output(&ctx.service.update_contract(&args.id, update).await?, flags.format)
        }
        ContractCommands::Delete(args) => {
            ctx.service.delete_contract(&args.id).await?;
            output(&Deleted::new(Collection::Contracts, &args.id), flags.format)
        }
        ContractCommands::Send(args) => signature::send::run::<Contract>(args, ctx, flags).await,
        ContractCommands::Sync { id } => {
            signature::sync::run::<Contract>(id.as_deref(), ctx, flags).await
        }
        ContractCommands::Void { id, reason } => void(id, reason, ctx, flags).await,
    }
}

/// Void the contract's open envelope (if any), then the contract itself.
async fn void(id: &str, reason: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if reason.trim().is_empty() {
        anyhow::bail!("--reason must not be empty");
    }
    let contract = ctx.service.get_contract(id).await?;
    if !contract.status.can_transition_to(ContractStatus::Voided) {
        anyhow::bail!("contract {id} is {} and cannot be voided", contract.status);
    }
    if let Some(signature) = contract
        .signature
        .as_ref()
        .filter(|signature| !signature.envelope_status.is_terminal())
    {
        let docusign = docusign_client(ctx).await?;
        docusign.void_envelope(&signature.envelope_id, reason).await?;
        tracing::debug!(contract_id = %id, envelope_id = %signature.envelope_id, "envelope voided");
    }
    let contract = ctx
        .service
        .transition_contract(id, ContractStatus::Voided)
        .await?;
    output(&contract, flags.format)
}
