use clap::Subcommand;

use super::ListArgs;

/// Generic document commands over any collection.
#[derive(Clone, Debug, Subcommand)]
pub enum DocCommands {
    /// Query documents of a collection.
    List {
        collection: String,
        #[command(flatten)]
        list: ListArgs,
    },
    /// Get one document.
    Get { collection: String, id: String },
    /// Add a document with a generated ID.
    Add {
        collection: String,
        /// JSON object, or @path to read it from a file.
        #[arg(long)]
        data: String,
    },
    /// Create or overwrite a document.
    Set {
        collection: String,
        id: String,
        #[arg(long)]
        data: String,
        /// Merge into the existing document instead of replacing it.
        #[arg(long)]
        merge: bool,
    },
    /// Patch an existing document (dotted keys set nested fields).
    Update {
        collection: String,
        id: String,
        #[arg(long)]
        data: String,
    },
    /// Delete a document.
    Delete { collection: String, id: String },
}
