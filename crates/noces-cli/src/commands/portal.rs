use crate::cli::GlobalFlags;
use crate::cli::root_commands::PortalArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `noces portal`.
pub async fn handle(args: &PortalArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let overview = ctx.service.portal_overview(args.client.as_deref()).await?;
    output(&overview, flags.format)
}
