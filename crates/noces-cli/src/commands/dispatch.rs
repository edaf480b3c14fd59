use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::cli::subcommands::QontoCommands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Client { action } => commands::client::handle(&action, ctx, flags).await,
        Commands::Event { action } => commands::event::handle(&action, ctx, flags).await,
        Commands::Task { action } => commands::task::handle(&action, ctx, flags).await,
        Commands::Expense { action } => commands::expense::handle(&action, ctx, flags).await,
        Commands::Invoice { action } => commands::invoice::handle(&action, ctx, flags).await,
        Commands::Devis { action } => commands::devis::handle(&action, ctx, flags).await,
        Commands::Contract { action } => commands::contract::handle(&action, ctx, flags).await,
        Commands::Vendor { action } => commands::vendor::handle(&action, ctx, flags).await,
        Commands::Article { action } => commands::stock::handle_article(&action, ctx, flags).await,
        Commands::Composition { action } => {
            commands::stock::handle_composition(&action, ctx, flags).await
        }
        Commands::Warehouse { action } => {
            commands::stock::handle_warehouse(&action, ctx, flags).await
        }
        Commands::PostIt { action } => commands::post_it::handle(&action, ctx, flags).await,
        Commands::Doc { action } => commands::doc::handle(&action, ctx, flags).await,
        Commands::File { action } => commands::file::handle(&action, ctx, flags).await,
        Commands::Portal(args) => commands::portal::handle(&args, ctx, flags).await,
        Commands::Qonto {
            action: action @ QontoCommands::Connect { .. },
        } => commands::qonto::handle(&action, ctx, flags).await,
        Commands::Auth { .. }
        | Commands::Qonto {
            action: QontoCommands::Verify(_),
        } => unreachable!("auth and qonto verify are pre-dispatched in main"),
    }
}
