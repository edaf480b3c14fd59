use chrono::NaiveDate;
use clap::{Args, Subcommand};

use super::{IdArg, ListArgs};

/// Client commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ClientCommands {
    /// Create a client.
    Create(ClientCreateArgs),
    /// Get a client by ID.
    Get(IdArg),
    /// List clients.
    List(ListArgs),
    /// Update a client (an empty value clears an optional field).
    Update(ClientUpdateArgs),
    /// Delete a client.
    Delete(IdArg),
    /// Change the client status (lead, active, archived).
    Status { id: String, status: String },
}

#[derive(Clone, Debug, Args)]
pub struct ClientCreateArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub partner: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub wedding_date: Option<NaiveDate>,
    /// Budget in euros (e.g. "25000" or "25 000,50").
    #[arg(long)]
    pub budget: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    /// Email the client signs into the portal with.
    #[arg(long)]
    pub portal_email: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ClientUpdateArgs {
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub partner: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub wedding_date: Option<String>,
    #[arg(long)]
    pub budget: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    #[arg(long)]
    pub portal_email: Option<String>,
}
