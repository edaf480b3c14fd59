use chrono::NaiveDate;
use clap::{Args, Subcommand};

use super::{IdArg, ListArgs};

/// Expense commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense.
    Create(ExpenseCreateArgs),
    /// Get an expense by ID.
    Get(IdArg),
    /// List expenses.
    List(ListArgs),
    /// Update an expense (an empty value clears an optional field).
    Update(ExpenseUpdateArgs),
    /// Delete an expense.
    Delete(IdArg),
    /// Total expenses of an event or a client.
    Total(ExpenseTotalArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ExpenseCreateArgs {
    #[arg(long)]
    pub label: String,
    /// Amount in euros, must be positive (e.g. "350" or "1 250,50").
    #[arg(long, allow_hyphen_values = true)]
    pub amount: String,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub client: Option<String>,
    #[arg(long)]
    pub event: Option<String>,
    #[arg(long)]
    pub vendor: Option<String>,
    #[arg(long)]
    pub paid: bool,
}

#[derive(Clone, Debug, Args)]
pub struct ExpenseUpdateArgs {
    pub id: String,
    #[arg(long)]
    pub label: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub amount: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub client: Option<String>,
    #[arg(long)]
    pub event: Option<String>,
    #[arg(long)]
    pub vendor: Option<String>,
    #[arg(long)]
    pub paid: Option<bool>,
}

#[derive(Clone, Debug, Args)]
#[group(required = true, multiple = false)]
pub struct ExpenseTotalArgs {
    #[arg(long)]
    pub event: Option<String>,
    #[arg(long)]
    pub client: Option<String>,
}
