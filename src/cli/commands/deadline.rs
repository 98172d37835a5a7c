//! `prr deadline` command - Business-day arithmetic from the command line

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{format_date, parse_timestamp};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::calendar::T10_BUSINESS_DAYS;
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct DeadlineArgs {
    /// Start date (YYYY-MM-DD) or RFC 3339 timestamp
    pub from: String,

    /// Business days to add
    #[arg(long, short = 'd', default_value_t = T10_BUSINESS_DAYS, allow_hyphen_values = true)]
    pub days: i64,
}

pub fn run(args: DeadlineArgs, global: &GlobalOpts) -> Result<()> {
    // Works outside a project too; holidays then come from the user layer only
    let calendar = Config::load().calendar();

    let start = parse_timestamp(&args.from)?;
    let due = calendar
        .add_business_days(start, args.days)
        .map_err(|e| miette::miette!("{}", e))?;

    match global.output {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "from": start,
                "business_days": args.days,
                "due": due,
            });
            println!("{}", serde_json::to_string_pretty(&value).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            let value = serde_json::json!({
                "from": start,
                "business_days": args.days,
                "due": due,
            });
            print!("{}", serde_yml::to_string(&value).into_diagnostic()?);
        }
        OutputFormat::Id | OutputFormat::Tsv | OutputFormat::Csv => {
            println!("{}", due.format("%Y-%m-%d"));
        }
        OutputFormat::Auto | OutputFormat::Table => {
            println!(
                "{} + {} business day(s) = {}",
                format_date(&start),
                args.days,
                style(format_date(&due)).yellow().bold()
            );
        }
    }
    Ok(())
}
