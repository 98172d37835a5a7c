//! Command-line argument definitions

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    act::ActArgs, completions::CompletionsArgs, deadline::DeadlineArgs, init::InitArgs,
    list::ListArgs, log::LogArgs, new::NewArgs, show::ShowArgs, validate::ValidateArgs,
};

/// PRR: public records request intake, deadlines and case tracking
#[derive(Parser, Debug)]
#[command(name = "prr", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options accepted by every subcommand
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'o', global = true, default_value = "auto")]
    pub output: OutputFormat,

    /// Show debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

/// Output formats
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Table for lists, readable text for single records
    #[default]
    Auto,
    Table,
    Yaml,
    Json,
    Tsv,
    Csv,
    /// Case IDs only, one per line
    Id,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a project in the current (or given) directory
    Init(InitArgs),

    /// Record a new public records request
    New(NewArgs),

    /// List cases with filtering
    List(ListArgs),

    /// Show one case with its audit log
    Show(ShowArgs),

    /// Record an action against a case, optionally changing its status
    Act(ActArgs),

    /// Validate case files against the case schema
    Validate(ValidateArgs),

    /// Compute a business-day deadline
    Deadline(DeadlineArgs),

    /// Audit activity across all cases
    Log(LogArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
