//! `prr show` command - One case with its audit log

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{format_date, styled_deadline, Session};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::shortid::ShortIdIndex;
use crate::entities::CaseRecord;

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Case ID or short ID (@N)
    pub id: String,
}

pub fn run(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open()?;
    let case_id = session.resolve_case_id(&args.id)?;
    let case = session.desk.get(&case_id)?;

    match global.output {
        OutputFormat::Id => println!("{}", case.case_id),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&case).into_diagnostic()?)
        }
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&case).into_diagnostic()?),
        _ => print_case(&case, &session),
    }
    Ok(())
}

fn print_case(case: &CaseRecord, session: &Session) {
    let now = session.desk.engine().now();
    let alias = ShortIdIndex::load(&session.project)
        .get_short_id(&case.case_id)
        .map(|n| format!(" {}", style(format!("(@{})", n)).dim()))
        .unwrap_or_default();

    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {}{}",
        style("ID").bold(),
        style(&case.case_id).cyan(),
        alias
    );
    println!("{}: {}", style("Status").bold(), case.status);
    println!(
        "{}: {} / {}",
        style("Environment").bold(),
        case.environment,
        case.module
    );
    println!("{}", style("─".repeat(60)).dim());

    println!();
    println!("{}", style("Requester:").bold());
    println!("  {}", case.requester.name);
    if let Some(ref email) = case.requester.email {
        println!("  {}", email);
    }
    if let Some(ref phone) = case.requester.phone {
        println!("  {}", phone);
    }

    println!();
    println!("{}", style("Intake:").bold());
    println!("  Received: {}", format_date(&case.intake.received_at));
    println!("  Channel:  {}", case.intake.channel);
    println!(
        "  Notice:   {}",
        if case.intake.legal_notice_accepted {
            "accepted"
        } else {
            "not accepted"
        }
    );

    println!();
    println!("{}", style("Request:").bold());
    for line in case.intake.request_text.lines() {
        println!("  {}", line);
    }

    println!();
    println!(
        "{}: {} ({})",
        style("T10").bold(),
        format_date(&case.deadlines.t10),
        styled_deadline(case, now, session.calendar())
    );

    println!();
    println!("{}", style("Audit log:").bold());
    for entry in &case.audit_log {
        let transition = entry
            .transition
            .map(|t| format!(" [{} → {}]", t.from, t.to))
            .unwrap_or_default();
        println!(
            "  {}  {}  {}{}",
            style(entry.at.format("%Y-%m-%d %H:%M")).dim(),
            style(&entry.actor).yellow(),
            entry.action,
            style(transition).cyan()
        );
        if let Some(ref detail) = entry.detail {
            println!("      {}", style(detail).dim());
        }
    }

    println!();
    println!("{}", style(format!("version {}", case.version)).dim());
}
