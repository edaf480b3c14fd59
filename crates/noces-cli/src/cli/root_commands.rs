use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    ArticleCommands, AuthCommands, ClientCommands, CompositionCommands, ContractCommands,
    DevisCommands, DocCommands, EventCommands, ExpenseCommands, FileCommands, InvoiceCommands,
    PostItCommands, QontoCommands, TaskCommands, VendorCommands, WarehouseCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Authentication (Firebase).
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Clients of the agency.
    Client {
        #[command(subcommand)]
        action: ClientCommands,
    },
    /// Wedding events (one per client).
    Event {
        #[command(subcommand)]
        action: EventCommands,
    },
    /// Tasks.
    Task {
        #[command(subcommand)]
        action: TaskCommands,
    },
    /// Expenses.
    Expense {
        #[command(subcommand)]
        action: ExpenseCommands,
    },
    /// Invoices and Qonto payment links.
    Invoice {
        #[command(subcommand)]
        action: InvoiceCommands,
    },
    /// Quotes (devis) and their DocuSign signature.
    Devis {
        #[command(subcommand)]
        action: DevisCommands,
    },
    /// Contracts and their DocuSign signature.
    Contract {
        #[command(subcommand)]
        action: ContractCommands,
    },
    /// Vendors.
    Vendor {
        #[command(subcommand)]
        action: VendorCommands,
    },
    /// Stock articles.
    Article {
        #[command(subcommand)]
        action: ArticleCommands,
    },
    /// Compositions of articles.
    Composition {
        #[command(subcommand)]
        action: CompositionCommands,
    },
    /// Warehouses.
    Warehouse {
        #[command(subcommand)]
        action: WarehouseCommands,
    },
    /// Post-it notes.
    #[command(name = "postit")]
    PostIt {
        #[command(subcommand)]
        action: PostItCommands,
    },
    /// Generic document access.
    Doc {
        #[command(subcommand)]
        action: DocCommands,
    },
    /// File storage (Cloudinary).
    File {
        #[command(subcommand)]
        action: FileCommands,
    },
    /// Qonto connection and webhooks.
    Qonto {
        #[command(subcommand)]
        action: QontoCommands,
    },
    /// Client portal overview.
    Portal(PortalArgs),
}

/// Arguments for `noces portal`.
#[derive(Clone, Debug, Args)]
pub struct PortalArgs {
    /// Client to show (implied when signed in as a portal client).
    #[arg(long)]
    pub client: Option<String>,
}
