use clap::{Args, Subcommand};

use super::devis::SendForSignatureArgs;
use super::{IdArg, ListArgs};

/// Contract commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ContractCommands {
    /// Create a draft contract.
    Create(ContractCreateArgs),
    /// Get a contract by ID.
    Get(IdArg),
    /// List contracts.
    List(ListArgs),
    /// Update a contract (an empty value clears an optional field).
    Update(ContractUpdateArgs),
    /// Delete a contract.
    Delete(IdArg),
    /// Send the contract PDF for signature through DocuSign.
    Send(SendForSignatureArgs),
    /// Sync signature state from DocuSign (one contract, or all awaiting signature).
    Sync { id: Option<String> },
    /// Void the DocuSign envelope of a contract.
    Void {
        id: String,
        #[arg(long)]
        reason: String,
    },
}

#[derive(Clone, Debug, Args)]
pub struct ContractCreateArgs {
    #[arg(long)]
    pub client: String,
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub pdf_url: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ContractUpdateArgs {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub pdf_url: Option<String>,
}
