//! `prr list` command - Case listing with filters

use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::filters::{ChannelArg, StatusFilter};
use crate::cli::helpers::{deadline_label, truncate_str, Session};
use crate::cli::output::effective_format;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::shortid::ShortIdIndex;
use crate::core::store::CaseFilter;
use crate::entities::CaseRecord;

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by status
    #[arg(long, short = 's', value_enum, default_value_t = StatusFilter::Open)]
    pub status: StatusFilter,

    /// Filter by intake channel
    #[arg(long, value_enum)]
    pub channel: Option<ChannelArg>,

    /// Requester name or email contains (case-insensitive)
    #[arg(long, short = 'r')]
    pub requester: Option<String>,

    /// Request text contains (case-insensitive)
    #[arg(long)]
    pub search: Option<String>,

    /// Only open cases past their T10 deadline
    #[arg(long)]
    pub overdue: bool,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show count only
    #[arg(long)]
    pub count: bool,
}

#[derive(Tabled)]
struct CaseRow {
    #[tabled(rename = "#")]
    short: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Requester")]
    requester: String,
    #[tabled(rename = "Received")]
    received: String,
    #[tabled(rename = "T10")]
    t10: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Summary")]
    summary: String,
}

pub fn run(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open()?;
    let now = session.desk.engine().now();

    let filter = CaseFilter {
        statuses: args.status.statuses(),
        channel: args.channel.map(Into::into),
        requester: args.requester,
        search: args.search,
        overdue_at: args.overdue.then_some(now),
    };
    let mut cases = session.desk.list(&filter)?;
    if let Some(limit) = args.limit {
        cases.truncate(limit);
    }

    if args.count {
        println!("{}", cases.len());
        return Ok(());
    }

    // Number the rows so follow-up commands can use @N
    let mut short_ids = ShortIdIndex::load(&session.project);
    short_ids.rebuild(cases.iter().map(|c| &c.case_id));
    if let Err(e) = short_ids.save(&session.project) {
        tracing::warn!(error = %e, "could not save short ID index");
    }

    let format = effective_format(global.output, true);
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&cases).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&cases).into_diagnostic()?);
        }
        OutputFormat::Id => {
            for case in &cases {
                println!("{}", case.case_id);
            }
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.write_record(["short_id", "id", "status", "requester", "channel", "received_at", "t10"])
                .into_diagnostic()?;
            for (i, case) in cases.iter().enumerate() {
                wtr.write_record([
                    format!("@{}", i + 1),
                    case.case_id.to_string(),
                    case.status.to_string(),
                    case.requester.name.clone(),
                    case.intake.channel.to_string(),
                    case.intake.received_at.to_rfc3339(),
                    case.deadlines.t10.to_rfc3339(),
                ])
                .into_diagnostic()?;
            }
            wtr.flush().into_diagnostic()?;
        }
        OutputFormat::Tsv => {
            println!("SHORT\tID\tSTATUS\tREQUESTER\tRECEIVED\tT10\tREMAINING");
            for (i, case) in cases.iter().enumerate() {
                println!(
                    "@{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    i + 1,
                    case.case_id,
                    case.status,
                    case.requester.name,
                    case.intake.received_at.format("%Y-%m-%d"),
                    case.deadlines.t10.format("%Y-%m-%d"),
                    deadline_label(case, now, session.calendar()),
                );
            }
        }
        OutputFormat::Auto | OutputFormat::Table => {
            if cases.is_empty() {
                println!("No cases found.");
                return Ok(());
            }
            let rows: Vec<CaseRow> = cases
                .iter()
                .enumerate()
                .map(|(i, case)| row(i + 1, case, now, &session))
                .collect();
            println!("{}", Table::new(rows).with(Style::sharp()));
            println!();
            println!(
                "{} case(s). Use {} to reference by short ID.",
                style(cases.len()).cyan(),
                style("@N").cyan()
            );
        }
    }

    Ok(())
}

fn row(n: usize, case: &CaseRecord, now: chrono::DateTime<chrono::Utc>, session: &Session) -> CaseRow {
    CaseRow {
        short: format!("@{}", n),
        id: case.case_id.to_string(),
        status: case.status.to_string(),
        requester: truncate_str(&case.requester.name, 20),
        received: case.intake.received_at.format("%Y-%m-%d").to_string(),
        t10: case.deadlines.t10.format("%Y-%m-%d").to_string(),
        remaining: deadline_label(case, now, session.calendar()),
        summary: truncate_str(case.summary(), 40),
    }
}
