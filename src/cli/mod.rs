//! CLI module - argument parsing and command dispatch

pub mod args;
pub mod commands;
pub mod filters;
pub mod helpers;
pub mod output;

pub use args::{Cli, Commands, GlobalOpts, OutputFormat};
pub use filters::{ChannelArg, StatusFilter};

use miette::Result;

/// Dispatch a parsed command line
pub fn run(cli: Cli) -> Result<()> {
    let global = cli.global;
    match cli.command {
        Commands::Init(args) => commands::init::run(args, &global),
        Commands::New(args) => commands::new::run(args, &global),
        Commands::List(args) => commands::list::run(args, &global),
        Commands::Show(args) => commands::show::run(args, &global),
        Commands::Act(args) => commands::act::run(args, &global),
        Commands::Validate(args) => commands::validate::run(args, &global),
        Commands::Deadline(args) => commands::deadline::run(args, &global),
        Commands::Log(args) => commands::log::run(args, &global),
        Commands::Completions(args) => commands::completions::run(args),
    }
}
