//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use chrono::{DateTime, NaiveDate, Utc};
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::core::calendar::BusinessCalendar;
use crate::core::desk::CaseDesk;
use crate::core::identity::CaseId;
use crate::core::lifecycle::LifecycleEngine;
use crate::core::project::Project;
use crate::core::shortid::ShortIdIndex;
use crate::core::store::YamlCaseStore;
use crate::core::Config;
use crate::entities::CaseRecord;
use crate::schema::Validator;

/// Everything a case command needs: project, merged config and desk
pub struct Session {
    pub project: Project,
    pub config: Config,
    pub desk: CaseDesk<YamlCaseStore>,
}

impl Session {
    /// Discover the project from the current directory and open its store
    pub fn open() -> Result<Self> {
        let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
        let config = Config::load_for(Some(&project));

        let engine = LifecycleEngine::new(config.lifecycle(), config.calendar());
        let store = YamlCaseStore::new(project.cases_dir(), Validator::embedded()?);
        let desk = CaseDesk::new(engine, store, Validator::embedded()?);

        Ok(Self {
            project,
            config,
            desk,
        })
    }

    /// Turn `@N`, `N` or a (case-insensitive) case ID into a case ID
    pub fn resolve_case_id(&self, reference: &str) -> Result<CaseId> {
        resolve_case_id(&self.project, reference)
    }

    pub fn calendar(&self) -> &BusinessCalendar {
        self.desk.engine().calendar()
    }
}

/// Resolve a short alias or full case ID
pub fn resolve_case_id(project: &Project, reference: &str) -> Result<CaseId> {
    let short_ids = ShortIdIndex::load(project);
    let resolved = short_ids.resolve(reference).ok_or_else(|| {
        miette::miette!(
            "No case {} in the last listing. Run 'prr list' to refresh aliases",
            reference
        )
    })?;
    resolved.parse::<CaseId>().into_diagnostic()
}

/// Parse a date (`YYYY-MM-DD`, taken as noon UTC) or an RFC 3339 timestamp
///
/// Noon keeps plain dates clear of day boundaries when the result is
/// rendered in a local time zone.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        miette::miette!(
            "Invalid date '{}': expected YYYY-MM-DD or an RFC 3339 timestamp",
            s
        )
    })?;
    date.and_hms_opt(12, 0, 0)
        .map(|dt| dt.and_utc())
        .ok_or_else(|| miette::miette!("Invalid date '{}'", s))
}

/// Format a timestamp as `2026-02-16 Mon`
pub fn format_date(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %a").to_string()
}

/// Plain-text deadline state, e.g. `3 days`, `due today`, `OVERDUE`, `closed`
pub fn deadline_label(case: &CaseRecord, now: DateTime<Utc>, calendar: &BusinessCalendar) -> String {
    if !case.is_open() {
        return case.status.to_string().to_lowercase();
    }
    if calendar.is_overdue(now, case.deadlines.t10) {
        return "OVERDUE".to_string();
    }
    match calendar.business_days_remaining(now, case.deadlines.t10) {
        0 => "due today".to_string(),
        1 => "1 day".to_string(),
        n => format!("{} days", n),
    }
}

/// Same as [`deadline_label`], colored for terminals
pub fn styled_deadline(case: &CaseRecord, now: DateTime<Utc>, calendar: &BusinessCalendar) -> String {
    let label = deadline_label(case, now, calendar);
    if !case.is_open() {
        return style(label).dim().to_string();
    }
    if calendar.is_overdue(now, case.deadlines.t10) {
        return style(label).red().bold().to_string();
    }
    if calendar.business_days_remaining(now, case.deadlines.t10) <= 2 {
        style(label).yellow().to_string()
    } else {
        style(label).green().to_string()
    }
}

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("público récords", 9), "público...");
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(
            parse_timestamp("2026-02-02").unwrap(),
            Utc.with_ymd_and_hms(2026, 2, 2, 12, 0, 0).unwrap()
        );
        assert_eq!(
            parse_timestamp("2026-02-02T08:30:00-05:00").unwrap(),
            Utc.with_ymd_and_hms(2026, 2, 2, 13, 30, 0).unwrap()
        );
        assert!(parse_timestamp("02/02/2026").is_err());
    }

    #[test]
    fn test_format_date() {
        let ts = Utc.with_ymd_and_hms(2026, 2, 16, 12, 0, 0).unwrap();
        assert_eq!(format_date(&ts), "2026-02-16 Mon");
    }
}
