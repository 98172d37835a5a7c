//! `prr act` command - Record an action, optionally moving the case

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::filters::parse_status;
use crate::cli::helpers::Session;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::entity::CaseStatus;
use crate::core::lifecycle::ActionRequest;

#[derive(clap::Args, Debug)]
pub struct ActArgs {
    /// Case ID or short ID (@N)
    pub id: String,

    /// Action name recorded in the audit log (e.g. assessed, records_gathered)
    #[arg(long, short = 'a')]
    pub action: String,

    /// Free-form detail for the audit entry
    #[arg(long, short = 'd')]
    pub detail: Option<String>,

    /// Move the case to this status
    #[arg(long, short = 's', value_parser = parse_status)]
    pub status: Option<CaseStatus>,

    /// Actor recorded on the entry (default: config actor)
    #[arg(long)]
    pub actor: Option<String>,
}

pub fn run(args: ActArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open()?;
    let case_id = session.resolve_case_id(&args.id)?;
    let actor = args.actor.unwrap_or_else(|| session.config.actor());

    let mut request = ActionRequest::new(actor, args.action);
    if let Some(detail) = args.detail {
        request = request.with_detail(detail);
    }
    if let Some(status) = args.status {
        request = request.with_status(status);
    }
    let action = request.action.clone();

    let case = session.desk.act(&case_id, request)?;

    match global.output {
        OutputFormat::Id => println!("{}", case.case_id),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&case).into_diagnostic()?)
        }
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&case).into_diagnostic()?),
        _ if global.quiet => {}
        _ => match case.last_entry().and_then(|e| e.transition) {
            Some(change) => println!(
                "{} {} {} → {}",
                style("✓").green(),
                style(&case.case_id).cyan(),
                change.from,
                style(change.to).bold()
            ),
            None => println!(
                "{} Recorded '{}' on {}",
                style("✓").green(),
                action,
                style(&case.case_id).cyan()
            ),
        },
    }
    Ok(())
}
