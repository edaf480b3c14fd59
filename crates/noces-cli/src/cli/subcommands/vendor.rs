use clap::{Args, Subcommand};

use super::{IdArg, ListArgs};

/// Vendor commands.
#[derive(Clone, Debug, Subcommand)]
pub enum VendorCommands {
    /// Create a vendor.
    Create(VendorArgs),
    /// Get a vendor by ID.
    Get(IdArg),
    /// List vendors.
    List(ListArgs),
    /// Update a vendor (an empty value clears an optional field).
    Update {
        id: String,
        #[command(flatten)]
        fields: VendorArgs,
    },
    /// Delete a vendor.
    Delete(IdArg),
}

/// Vendor fields; `name` is required on create.
#[derive(Clone, Debug, Args)]
pub struct VendorArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub website: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}
