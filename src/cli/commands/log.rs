//! `prr log` command - Audit activity across all cases
//!
//! Flattens every case's audit log into one chronological listing,
//! newest first.

use chrono::{DateTime, NaiveDate, Utc};
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{truncate_str, Session};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::store::CaseFilter;

#[derive(clap::Args, Debug)]
pub struct LogArgs {
    /// Filter by actor name (case-insensitive substring)
    #[arg(long, short = 'a')]
    pub actor: Option<String>,

    /// Only entries for this case (ID or @N)
    #[arg(long, short = 'c')]
    pub case: Option<String>,

    /// Show entries since date (YYYY-MM-DD)
    #[arg(long)]
    pub since: Option<String>,

    /// Show entries until date (YYYY-MM-DD, inclusive)
    #[arg(long)]
    pub until: Option<String>,

    /// Limit number of entries
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

/// Audit entry with the case it belongs to
#[derive(Debug, Clone, serde::Serialize)]
struct LogEntry {
    at: DateTime<Utc>,
    case_id: String,
    actor: String,
    action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transition: Option<String>,
}

pub fn run(args: LogArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open()?;

    let since = args.since.as_deref().map(parse_day).transpose()?;
    let until = args
        .until
        .as_deref()
        .map(parse_day)
        .transpose()?
        .and_then(|d| d.succ_opt());

    let cases = match args.case {
        Some(ref reference) => {
            let case_id = session.resolve_case_id(reference)?;
            vec![session.desk.get(&case_id)?]
        }
        None => session.desk.list(&CaseFilter::default())?,
    };

    let actor_filter = args.actor.as_ref().map(|a| a.to_lowercase());
    let mut entries: Vec<LogEntry> = cases
        .iter()
        .flat_map(|case| {
            case.audit_log.iter().map(move |entry| LogEntry {
                at: entry.at,
                case_id: case.case_id.to_string(),
                actor: entry.actor.clone(),
                action: entry.action.clone(),
                detail: entry.detail.clone(),
                transition: entry.transition.map(|t| format!("{} → {}", t.from, t.to)),
            })
        })
        .filter(|e| {
            actor_filter
                .as_ref()
                .map_or(true, |a| e.actor.to_lowercase().contains(a))
        })
        .filter(|e| since.map_or(true, |d| e.at.date_naive() >= d))
        .filter(|e| until.map_or(true, |d| e.at.date_naive() < d))
        .collect();

    entries.sort_by(|a, b| b.at.cmp(&a.at).then_with(|| a.case_id.cmp(&b.case_id)));

    if let Some(limit) = args.limit {
        entries.truncate(limit);
    }

    match global.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&entries).into_diagnostic()?);
        }
        OutputFormat::Tsv => {
            println!("AT\tCASE\tACTOR\tACTION\tTRANSITION");
            for e in &entries {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    e.at.to_rfc3339(),
                    e.case_id,
                    e.actor,
                    e.action,
                    e.transition.as_deref().unwrap_or("")
                );
            }
        }
        OutputFormat::Id => {
            let mut seen = std::collections::BTreeSet::new();
            for e in &entries {
                if seen.insert(e.case_id.clone()) {
                    println!("{}", e.case_id);
                }
            }
        }
        _ => {
            if entries.is_empty() {
                println!("No audit entries found.");
                return Ok(());
            }

            println!("\n{}\n", style("Case Activity Log").bold().underlined());
            println!(
                "{:<17} {:<14} {:<15} {:<20} DETAIL",
                "WHEN", "CASE", "ACTOR", "ACTION"
            );
            println!("{}", "-".repeat(90));

            for e in &entries {
                let detail = match (&e.transition, &e.detail) {
                    (Some(t), _) => t.clone(),
                    (None, Some(d)) => truncate_str(d, 30),
                    (None, None) => String::new(),
                };
                println!(
                    "{:<17} {:<14} {:<15} {:<20} {}",
                    style(e.at.format("%Y-%m-%d %H:%M")).dim(),
                    style(&e.case_id).cyan(),
                    truncate_str(&e.actor, 15),
                    truncate_str(&e.action, 20),
                    style(detail).dim()
                );
            }

            println!("\n{} audit entries.", entries.len());
        }
    }

    Ok(())
}

fn parse_day(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| miette::miette!("Invalid date '{}': expected YYYY-MM-DD", s))
}
