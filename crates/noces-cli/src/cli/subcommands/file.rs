use clap::{Args, Subcommand};

/// File storage commands.
#[derive(Clone, Debug, Subcommand)]
pub enum FileCommands {
    /// Upload a PDF to Cloudinary, optionally recording its URL on a document.
    Upload(FileUploadArgs),
}

#[derive(Clone, Debug, Args)]
pub struct FileUploadArgs {
    pub path: std::path::PathBuf,
    /// Collection of the document to update.
    #[arg(long, requires = "id")]
    pub collection: Option<String>,
    /// Document to update.
    #[arg(long, requires = "collection")]
    pub id: Option<String>,
    /// Field receiving the URL.
    #[arg(long, default_value = "pdf_url")]
    pub field: String,
    /// Cloudinary public ID (defaults to a generated one).
    #[arg(long)]
    pub public_id: Option<String>,
}
