use clap::{Args, Subcommand};

use super::{IdArg, ListArgs};

/// Article commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ArticleCommands {
    /// Create an article.
    Create(ArticleCreateArgs),
    /// Get an article by ID.
    Get(IdArg),
    /// List articles.
    List(ListArgs),
    /// Update an article (stock changes go through `article stock`).
    Update(ArticleUpdateArgs),
    /// Delete an article.
    Delete(IdArg),
    /// Add to (or remove from, with a negative delta) the stock.
    Stock {
        id: String,
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
}

#[derive(Clone, Debug, Args)]
pub struct ArticleCreateArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub category: Option<String>,
    /// Unit price in euros.
    #[arg(long)]
    pub price: String,
    #[arg(long, default_value_t = 0)]
    pub stock: u32,
    #[arg(long)]
    pub warehouse: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ArticleUpdateArgs {
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub price: Option<String>,
    #[arg(long)]
    pub warehouse: Option<String>,
}

/// Composition commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CompositionCommands {
    /// Create a composition.
    Create(CompositionCreateArgs),
    /// Get a composition by ID.
    Get(IdArg),
    /// List compositions.
    List(ListArgs),
    /// Update a composition.
    Update(CompositionUpdateArgs),
    /// Delete a composition.
    Delete(IdArg),
    /// Cost of a composition from its articles' unit prices.
    Cost(IdArg),
}

#[derive(Clone, Debug, Args)]
pub struct CompositionCreateArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: Option<String>,
    /// Article as "article_id:quantity", repeatable.
    #[arg(long = "article", value_name = "ARTICLE")]
    pub articles: Vec<String>,
}

#[derive(Clone, Debug, Args)]
pub struct CompositionUpdateArgs {
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Replace the articles ("article_id:quantity", repeatable).
    #[arg(long = "article", value_name = "ARTICLE")]
    pub articles: Vec<String>,
}

/// Warehouse commands.
#[derive(Clone, Debug, Subcommand)]
pub enum WarehouseCommands {
    /// Create a warehouse.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: Option<String>,
    },
    /// Get a warehouse by ID.
    Get(IdArg),
    /// List warehouses.
    List(ListArgs),
    /// Update a warehouse.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    /// Delete a warehouse.
    Delete(IdArg),
    /// Articles stored in a warehouse.
    Articles(IdArg),
}
