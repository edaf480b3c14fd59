use noces_core::collections::Collection;
use noces_db::updates::vendor::{NewVendor, VendorUpdate};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::VendorCommands;
use crate::cli::subcommands::vendor::VendorArgs;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{build_query, clearable_text, require_changes};
use crate::commands::shared::responses::Deleted;
use crate::context::AppContext;
use crate::output::output;

/// Handle `noces vendor`.
pub async fn handle(
    action: &VendorCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        VendorCommands::Create(args) => {
            output(&ctx.service.create_vendor(new_vendor(args)?).await?, flags.format)
        }
        VendorCommands::Get(args) => output(&ctx.service.get_vendor(&args.id).await?, flags.format),
        VendorCommands::List(list) => {
            let limit = effective_limit(flags.limit, ctx.config.general.default_limit);
            output(&ctx.service.list_vendors(&build_query(list, limit)?).await?, flags.format)
        }
        VendorCommands::Update { id, fields } => {
            output(&ctx.service.update_vendor(id, vendor_update(fields)?).await?, flags.format)
        }
        VendorCommands::Delete(args) => {
            ctx.service.delete_vendor(&args.id).await?;
            output(&Deleted::new(Collection::Vendors, &args.id), flags.format)
        }
    }
}

fn new_vendor(args: &VendorArgs) -> anyhow::Result<NewVendor> {
    let name = args
        .name
        .clone()
        .ok_or_else(|| anyhow::anyhow!("vendor create requires --name"))?;
    Ok(NewVendor {
        name,
        category: args.category.clone(),
        email: args.email.clone(),
        phone: args.phone.clone(),
        website: args.website.clone(),
        notes: args.notes.clone(),
    })
}

fn vendor_update(args: &VendorArgs) -> anyhow::Result<VendorUpdate> {
    let update = VendorUpdate {
        name: args.name.clone(),
        category: clearable_text(args.category.as_deref()),
        email: clearable_text(args.email.as_deref()),
        phone: clearable_text(args.phone.as_deref()),
        website: clearable_text(args.website.as_deref()),
        notes: clearable_text(args.notes.as_deref()),
    };
    require_changes(
        &update,
        "--name, --category, --email, --phone, --website or --notes",
    )?;
    Ok(update)
}
