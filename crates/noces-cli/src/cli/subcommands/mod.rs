use clap::Args;

pub mod auth;
pub mod client;
pub mod contract;
pub mod devis;
pub mod doc;
pub mod event;
pub mod expense;
pub mod file;
pub mod invoice;
pub mod post_it;
pub mod qonto;
pub mod stock;
pub mod task;
pub mod vendor;

pub use auth::AuthCommands;
pub use client::ClientCommands;
pub use contract::ContractCommands;
pub use devis::DevisCommands;
pub use doc::DocCommands;
pub use event::EventCommands;
pub use expense::ExpenseCommands;
pub use file::FileCommands;
pub use invoice::InvoiceCommands;
pub use post_it::PostItCommands;
pub use qonto::{QontoCommands, QontoVerifyArgs};
pub use stock::{ArticleCommands, CompositionCommands, WarehouseCommands};
pub use task::TaskCommands;
pub use vendor::VendorCommands;

/// Filtering and ordering shared by every `list` command.
///
/// The number of results comes from the global `--limit`.
#[derive(Clone, Debug, Default, Args)]
pub struct ListArgs {
    /// Filter as "field op value", repeatable (e.g. "status == sent",
    /// "tags array-contains vip", "total_cents >= 100000").
    #[arg(long = "where", value_name = "FILTER")]
    pub filters: Vec<String>,
    /// Field to order by (default: newest first).
    #[arg(long)]
    pub order_by: Option<String>,
    /// Ascending order for --order-by.
    #[arg(long, requires = "order_by")]
    pub asc: bool,
}

/// Document ID argument shared by get/delete commands.
#[derive(Clone, Debug, Args)]
pub struct IdArg {
    pub id: String,
}
