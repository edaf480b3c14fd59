use chrono::NaiveDate;
use clap::{Args, Subcommand};

use super::{IdArg, ListArgs};

/// Devis (quote) commands.
#[derive(Clone, Debug, Subcommand)]
pub enum DevisCommands {
    /// Create a draft devis.
    Create(DevisCreateArgs),
    /// Get a devis by ID.
    Get(IdArg),
    /// List devis.
    List(ListArgs),
    /// Update a devis (an empty value clears an optional field).
    Update(DevisUpdateArgs),
    /// Delete a devis.
    Delete(IdArg),
    /// Mark a sent devis accepted.
    Accept(IdArg),
    /// Mark a sent devis rejected.
    Reject(IdArg),
    /// Turn an accepted devis into a draft invoice.
    Convert {
        id: String,
        /// Invoice number (defaults to "F-<devis number>").
        #[arg(long)]
        number: Option<String>,
    },
    /// Send the devis PDF for signature through DocuSign.
    Send(SendForSignatureArgs),
    /// Sync signature state from DocuSign (one devis, or all awaiting signature).
    Sync { id: Option<String> },
}

#[derive(Clone, Debug, Args)]
pub struct DevisCreateArgs {
    #[arg(long)]
    pub client: String,
    #[arg(long)]
    pub number: String,
    /// Line item as "label:quantity:unit price", repeatable.
    #[arg(long = "item", value_name = "ITEM")]
    pub items: Vec<String>,
    /// Total in euros, required without items.
    #[arg(long)]
    pub total: Option<String>,
    #[arg(long)]
    pub valid_until: Option<NaiveDate>,
}

#[derive(Clone, Debug, Args)]
pub struct DevisUpdateArgs {
    pub id: String,
    #[arg(long)]
    pub number: Option<String>,
    #[arg(long = "item", value_name = "ITEM")]
    pub items: Vec<String>,
    #[arg(long)]
    pub total: Option<String>,
    #[arg(long)]
    pub valid_until: Option<String>,
    #[arg(long)]
    pub pdf_url: Option<String>,
}

/// Shared by `devis send` and `contract send`.
#[derive(Clone, Debug, Args)]
pub struct SendForSignatureArgs {
    pub id: String,
    /// PDF to sign. Signature fields are anchored on "/sn1/", "/sn2/", ...
    #[arg(long)]
    pub pdf: std::path::PathBuf,
    /// Signer as "Name <email>", repeatable (defaults to the client).
    #[arg(long = "signer", value_name = "SIGNER")]
    pub signers: Vec<String>,
    /// Email subject of the envelope.
    #[arg(long)]
    pub subject: Option<String>,
}
