use clap::{Args, Subcommand};

use super::{IdArg, ListArgs};

/// Post-it commands.
#[derive(Clone, Debug, Subcommand)]
pub enum PostItCommands {
    /// Create a post-it.
    Create(PostItCreateArgs),
    /// Get a post-it by ID.
    Get(IdArg),
    /// List post-its.
    List(ListArgs),
    /// Update a post-it.
    Update(PostItUpdateArgs),
    /// Delete a post-it.
    Delete(IdArg),
}

#[derive(Clone, Debug, Args)]
pub struct PostItCreateArgs {
    #[arg(long)]
    pub content: String,
    /// yellow, pink, blue or green.
    #[arg(long)]
    pub color: Option<String>,
    #[arg(long)]
    pub client: Option<String>,
    #[arg(long)]
    pub pinned: bool,
}

#[derive(Clone, Debug, Args)]
pub struct PostItUpdateArgs {
    pub id: String,
    #[arg(long)]
    pub content: Option<String>,
    #[arg(long)]
    pub color: Option<String>,
    #[arg(long)]
    pub client: Option<String>,
    #[arg(long)]
    pub pinned: Option<bool>,
}
