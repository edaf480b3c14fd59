use chrono::NaiveDate;
use clap::{Args, Subcommand};

use super::{IdArg, ListArgs};

/// Event commands.
#[derive(Clone, Debug, Subcommand)]
pub enum EventCommands {
    /// Create the event of a client.
    Create(EventCreateArgs),
    /// Get an event by ID.
    Get(IdArg),
    /// List events.
    List(ListArgs),
    /// Update an event (an empty value clears an optional field).
    Update(EventUpdateArgs),
    /// Delete an event.
    Delete(IdArg),
    /// Change the event status (planned, confirmed, completed, cancelled).
    Status { id: String, status: String },
}

#[derive(Clone, Debug, Args)]
pub struct EventCreateArgs {
    #[arg(long)]
    pub client: String,
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub venue: Option<String>,
    #[arg(long)]
    pub guests: Option<u32>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct EventUpdateArgs {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub venue: Option<String>,
    #[arg(long)]
    pub guests: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}
