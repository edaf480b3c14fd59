use clap::{Args, Subcommand};

/// Qonto commands.
#[derive(Clone, Debug, Subcommand)]
pub enum QontoCommands {
    /// Connect the planner's Qonto account (OAuth in the browser).
    Connect {
        /// Seconds to wait for the browser callback.
        #[arg(long, default_value_t = 180)]
        timeout: u64,
    },
    /// Verify the signature of a webhook payload.
    Verify(QontoVerifyArgs),
}

#[derive(Clone, Debug, Args)]
pub struct QontoVerifyArgs {
    /// File holding the raw request body.
    #[arg(long)]
    pub payload: std::path::PathBuf,
    /// Value of the X-Qonto-Signature header.
    #[arg(long)]
    pub signature: String,
}
