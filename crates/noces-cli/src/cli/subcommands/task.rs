use chrono::NaiveDate;
use clap::{Args, Subcommand};

use super::{IdArg, ListArgs};

/// Task commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TaskCommands {
    /// Create a task.
    Create(TaskCreateArgs),
    /// Get a task by ID.
    Get(IdArg),
    /// List tasks.
    List(ListArgs),
    /// Update a task (an empty value clears an optional field).
    Update(TaskUpdateArgs),
    /// Delete a task.
    Delete(IdArg),
    /// Change the task status (todo, in_progress, done, blocked).
    Status { id: String, status: String },
    /// Mark a task done.
    Complete(IdArg),
}

#[derive(Clone, Debug, Args)]
pub struct TaskCreateArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub client: Option<String>,
    #[arg(long)]
    pub event: Option<String>,
    #[arg(long)]
    pub due: Option<NaiveDate>,
    /// low, medium or high.
    #[arg(long)]
    pub priority: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct TaskUpdateArgs {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub client: Option<String>,
    #[arg(long)]
    pub event: Option<String>,
    #[arg(long)]
    pub due: Option<String>,
    #[arg(long)]
    pub priority: Option<String>,
}
