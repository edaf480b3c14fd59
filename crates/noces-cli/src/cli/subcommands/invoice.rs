use chrono::NaiveDate;
use clap::{Args, Subcommand};

use super::{IdArg, ListArgs};

/// Invoice commands.
#[derive(Clone, Debug, Subcommand)]
pub enum InvoiceCommands {
    /// Create a draft invoice.
    Create(InvoiceCreateArgs),
    /// Get an invoice by ID.
    Get(IdArg),
    /// List invoices.
    List(ListArgs),
    /// Update an invoice (an empty value clears an optional field).
    Update(InvoiceUpdateArgs),
    /// Delete an invoice.
    Delete(IdArg),
    /// Change the invoice status (draft, sent, cancelled, ...).
    Status { id: String, status: String },
    /// Record a payment received outside Qonto.
    Pay {
        id: String,
        /// Amount in euros.
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
    },
    /// Create a Qonto payment link for the invoice and mark it sent.
    Send(IdArg),
    /// Sync payment state from Qonto (one invoice, or all awaiting payment).
    Sync { id: Option<String> },
}

#[derive(Clone, Debug, Args)]
pub struct InvoiceCreateArgs {
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
    pub due: Option<NaiveDate>,
}

#[derive(Clone, Debug, Args)]
pub struct InvoiceUpdateArgs {
    pub id: String,
    #[arg(long)]
    pub number: Option<String>,
    /// Replace the line items ("label:quantity:unit price", repeatable).
    #[arg(long = "item", value_name = "ITEM")]
    pub items: Vec<String>,
    #[arg(long)]
    pub total: Option<String>,
    #[arg(long)]
    pub due: Option<String>,
    #[arg(long)]
    pub pdf_url: Option<String>,
}
