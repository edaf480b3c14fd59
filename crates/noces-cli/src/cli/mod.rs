use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `noces` binary.
#[derive(Debug, Parser)]
#[command(
    name = "noces",
    version,
    about = "Noces - wedding planner back office"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    #[must_use]
    pub const fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::subcommands::{
        ArticleCommands, DocCommands, ExpenseCommands, InvoiceCommands, QontoCommands,
        TaskCommands,
    };
    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "noces", "--format", "table", "--limit", "10", "--verbose", "task", "list",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.limit, Some(10));
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Task {
                action: TaskCommands::List(_)
            }
        ));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["noces", "portal", "--client", "cli-1", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Portal(_)));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["noces", "--format", "xml", "task", "list"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn repeated_where_filters_are_collected() {
        let cli = Cli::try_parse_from([
            "noces",
            "doc",
            "list",
            "invoices",
            "--where",
            "status == sent",
            "--where",
            "total_cents > 10000",
        ])
        .expect("cli should parse");

        let Commands::Doc {
            action: DocCommands::List { collection, list },
        } = cli.command
        else {
            panic!("expected doc list");
        };
        assert_eq!(collection, "invoices");
        assert_eq!(list.filters, vec!["status == sent", "total_cents > 10000"]);
    }

    #[test]
    fn negative_stock_delta_is_accepted() {
        let cli = Cli::try_parse_from(["noces", "article", "stock", "art-1", "-3"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Article {
                action: ArticleCommands::Stock { delta: -3, .. }
            }
        ));
    }

    #[test]
    fn expense_amount_is_kept_as_text() {
        let cli = Cli::try_parse_from([
            "noces", "expense", "create", "--label", "Fleurs", "--amount", "1 250,50",
        ])
        .expect("cli should parse");
        let Commands::Expense {
            action: ExpenseCommands::Create(args),
        } = cli.command
        else {
            panic!("expected expense create");
        };
        assert_eq!(args.amount, "1 250,50");
    }

    #[test]
    fn invoice_sync_id_is_optional() {
        let cli = Cli::try_parse_from(["noces", "invoice", "sync"]).expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Invoice {
                action: InvoiceCommands::Sync { id: None }
            }
        ));
    }

    #[test]
    fn qonto_verify_takes_payload_and_signature() {
        let cli = Cli::try_parse_from([
            "noces",
            "qonto",
            "verify",
            "--payload",
            "event.json",
            "--signature",
            "t=1,v1=ab",
        ])
        .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Qonto {
                action: QontoCommands::Verify(_)
            }
        ));
    }
}
