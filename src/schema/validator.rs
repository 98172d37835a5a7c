//! Case record validation
//!
//! Two passes over every candidate: the embedded JSON schema checks shape,
//! required fields and enum membership, then semantic checks cover what the
//! schema cannot express (trimmed-empty text, email format, deadline
//! ordering, audit chronology). All violations are collected before
//! reporting.

use miette::Diagnostic;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::entities::{CaseRecord, Requester};
use crate::schema::registry::{SchemaRegistry, CASE_SCHEMA};
use crate::yaml::{parse_yaml, YamlError};

/// One failed check, located by JSON pointer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// A candidate case record that does not conform
#[derive(Debug, Error, Diagnostic)]
#[error("Case record {source_name} failed validation: {}", format_violations(.violations))]
#[diagnostic(
    code(prr::schema::violation),
    help("Fix the listed fields; the record was not saved")
)]
pub struct ValidationError {
    pub source_name: String,
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn new(source_name: impl Into<String>, violations: Vec<Violation>) -> Self {
        Self {
            source_name: source_name.into(),
            violations,
        }
    }

    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    /// Whether any violation is reported at `path`
    pub fn has_violation_at(&self, path: &str) -> bool {
        self.violations.iter().any(|v| v.path == path)
    }
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// The embedded schema is missing or does not compile
#[derive(Debug, Error, Diagnostic)]
pub enum SchemaError {
    #[error("Schema not found: {0}")]
    #[diagnostic(code(prr::schema::missing))]
    Missing(String),

    #[error("Schema {name} is invalid: {message}")]
    #[diagnostic(code(prr::schema::invalid))]
    Invalid { name: String, message: String },
}

/// Failure validating a case file on disk
#[derive(Debug, Error, Diagnostic)]
pub enum CheckError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Schema(#[from] ValidationError),
}

impl CheckError {
    pub fn violation_count(&self) -> usize {
        match self {
            CheckError::Yaml(_) => 1,
            CheckError::Schema(e) => e.violation_count(),
        }
    }
}

/// Compiled case schema plus semantic checks
pub struct Validator {
    schema: jsonschema::Validator,
}

impl Validator {
    /// Compile the case schema from the registry
    pub fn new(registry: &SchemaRegistry) -> Result<Self, SchemaError> {
        let raw = registry
            .get(CASE_SCHEMA)
            .ok_or_else(|| SchemaError::Missing(CASE_SCHEMA.to_string()))?;
        let schema_json: Value =
            serde_json::from_str(raw).map_err(|e| SchemaError::Invalid {
                name: CASE_SCHEMA.to_string(),
                message: e.to_string(),
            })?;
        let schema = jsonschema::validator_for(&schema_json).map_err(|e| SchemaError::Invalid {
            name: CASE_SCHEMA.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self { schema })
    }

    /// Validator over the embedded schemas
    pub fn embedded() -> Result<Self, SchemaError> {
        Self::new(&SchemaRegistry::default())
    }

    /// Validate a typed record, handing it back on success
    pub fn validate_case(&self, candidate: CaseRecord) -> Result<CaseRecord, ValidationError> {
        let source_name = candidate.case_id.to_string();
        let value = serde_json::to_value(&candidate).map_err(|e| {
            ValidationError::new(&source_name, vec![Violation::new("/", e.to_string())])
        })?;
        self.validate_value(&value, &source_name)
    }

    /// Validate an untyped document and coerce it into a record
    pub fn validate_value(
        &self,
        value: &Value,
        source_name: &str,
    ) -> Result<CaseRecord, ValidationError> {
        let violations: Vec<Violation> = self
            .schema
            .iter_errors(value)
            .map(|e| {
                let path = e.instance_path.to_string();
                let path = if path.is_empty() { "/".to_string() } else { path };
                Violation::new(path, e.to_string())
            })
            .collect();
        if !violations.is_empty() {
            return Err(ValidationError::new(source_name, violations));
        }

        let record: CaseRecord = serde_json::from_value(value.clone()).map_err(|e| {
            ValidationError::new(source_name, vec![Violation::new("/", e.to_string())])
        })?;

        let violations = semantic_violations(&record);
        if !violations.is_empty() {
            return Err(ValidationError::new(source_name, violations));
        }

        Ok(record)
    }

    /// Parse and validate a case file's content
    pub fn validate_yaml(&self, content: &str, filename: &str) -> Result<CaseRecord, CheckError> {
        let value: Value = parse_yaml(content, filename)?;
        Ok(self.validate_value(&value, filename)?)
    }
}

/// Validate a record against the embedded schema
pub fn validate_case(candidate: CaseRecord) -> Result<CaseRecord, ValidationError> {
    let validator = Validator::embedded().map_err(|e| {
        ValidationError::new(
            candidate.case_id.to_string(),
            vec![Violation::new("/", e.to_string())],
        )
    })?;
    validator.validate_case(candidate)
}

/// Checks the JSON schema cannot express
pub fn semantic_violations(record: &CaseRecord) -> Vec<Violation> {
    let mut violations = requester_violations(&record.requester);

    if record.intake.request_text.trim().is_empty() {
        violations.push(Violation::new(
            "/intake/request_text",
            "request text must not be empty",
        ));
    }
    if record.environment.trim().is_empty() {
        violations.push(Violation::new("/environment", "must not be empty"));
    }
    if record.module.trim().is_empty() {
        violations.push(Violation::new("/module", "must not be empty"));
    }
    if record.deadlines.t10 <= record.intake.received_at {
        violations.push(Violation::new(
            "/deadlines/t10",
            format!(
                "T10 deadline {} must be after receipt {}",
                record.deadlines.t10.to_rfc3339(),
                record.intake.received_at.to_rfc3339()
            ),
        ));
    }
    if record.audit_log.is_empty() {
        violations.push(Violation::new(
            "/audit_log",
            "audit log must contain the creation entry",
        ));
    }
    for (i, pair) in record.audit_log.windows(2).enumerate() {
        if pair[1].at < pair[0].at {
            violations.push(Violation::new(
                format!("/audit_log/{}/at", i + 1),
                "audit entries must be in chronological order",
            ));
        }
    }
    for (i, entry) in record.audit_log.iter().enumerate() {
        if entry.actor.trim().is_empty() {
            violations.push(Violation::new(
                format!("/audit_log/{}/actor", i),
                "actor must not be empty",
            ));
        }
        if entry.action.trim().is_empty() {
            violations.push(Violation::new(
                format!("/audit_log/{}/action", i),
                "action must not be empty",
            ));
        }
    }

    violations
}

/// Requester checks shared with intake validation
pub fn requester_violations(requester: &Requester) -> Vec<Violation> {
    let mut violations = Vec::new();
    if requester.name.trim().is_empty() {
        violations.push(Violation::new(
            "/requester/name",
            "requester name must not be empty",
        ));
    }
    if let Some(email) = &requester.email {
        if !is_valid_email(email) {
            violations.push(Violation::new(
                "/requester/email",
                format!("'{}' is not a valid email address", email),
            ));
        }
    }
    violations
}

/// Pragmatic address check: `local@domain.tld`, no whitespace, sane labels
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    if email.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::{CaseStatus, Channel};
    use crate::entities::{AuditEntry, Deadlines, Intake};
    use chrono::{TimeDelta, TimeZone, Utc};

    fn valid_case() -> CaseRecord {
        let received = Utc.with_ymd_and_hms(2026, 2, 2, 15, 0, 0).unwrap();
        CaseRecord {
            case_id: "PRR-2026-7KQ4".parse().unwrap(),
            environment: "production".to_string(),
            module: "public-records".to_string(),
            status: CaseStatus::Intake,
            requester: Requester {
                name: "Dana Whitfield".to_string(),
                email: Some("dana@example.org".to_string()),
                phone: Some("555-0100".to_string()),
            },
            intake: Intake {
                received_at: received,
                channel: Channel::Email,
                request_text: "Police overtime reports, 2025".to_string(),
                legal_notice_accepted: true,
            },
            deadlines: Deadlines {
                t10: received + TimeDelta::days(14),
            },
            audit_log: vec![AuditEntry {
                at: received,
                actor: "clerk".to_string(),
                action: "intake_created".to_string(),
                detail: None,
                transition: None,
            }],
            version: 1,
        }
    }

    fn validator() -> Validator {
        Validator::embedded().unwrap()
    }

    #[test]
    fn test_valid_case_passes() {
        let case = valid_case();
        let validated = validator().validate_case(case.clone()).unwrap();
        assert_eq!(validated, case);
    }

    #[test]
    fn test_empty_name_and_text_rejected() {
        let mut case = valid_case();
        case.requester.name = "   ".to_string();
        case.intake.request_text = String::new();

        let err = validator().validate_case(case).unwrap_err();
        // Empty request text is caught by the schema before semantic checks run
        assert!(err.has_violation_at("/intake/request_text"));

        let mut case = valid_case();
        case.requester.name = "   ".to_string();
        let err = validator().validate_case(case).unwrap_err();
        assert!(err.has_violation_at("/requester/name"));
    }

    #[test]
    fn test_bad_email_rejected() {
        let mut case = valid_case();
        case.requester.email = Some("not-an-email".to_string());
        let err = validator().validate_case(case).unwrap_err();
        assert!(err.has_violation_at("/requester/email"));
    }

    #[test]
    fn test_missing_email_is_fine() {
        let mut case = valid_case();
        case.requester.email = None;
        assert!(validator().validate_case(case).is_ok());
    }

    #[test]
    fn test_deadline_must_follow_receipt() {
        let mut case = valid_case();
        case.deadlines.t10 = case.intake.received_at;
        let err = validator().validate_case(case).unwrap_err();
        assert!(err.has_violation_at("/deadlines/t10"));
    }

    #[test]
    fn test_empty_audit_log_rejected() {
        let mut case = valid_case();
        case.audit_log.clear();
        let err = validator().validate_case(case).unwrap_err();
        assert!(err.has_violation_at("/audit_log"));
    }

    #[test]
    fn test_out_of_order_audit_rejected() {
        let mut case = valid_case();
        let mut later = case.audit_log[0].clone();
        later.at = case.audit_log[0].at - TimeDelta::hours(1);
        later.action = "assessment".to_string();
        case.audit_log.push(later);
        let err = validator().validate_case(case).unwrap_err();
        assert!(err.has_violation_at("/audit_log/1/at"));
    }

    #[test]
    fn test_unknown_status_rejected_by_schema() {
        let mut value = serde_json::to_value(valid_case()).unwrap();
        value["status"] = Value::String("PENDING".to_string());
        let err = validator().validate_value(&value, "candidate").unwrap_err();
        assert!(err.has_violation_at("/status"));
    }

    #[test]
    fn test_unknown_channel_rejected_by_schema() {
        let mut value = serde_json::to_value(valid_case()).unwrap();
        value["intake"]["channel"] = Value::String("FAX".to_string());
        let err = validator().validate_value(&value, "candidate").unwrap_err();
        assert!(err.has_violation_at("/intake/channel"));
    }

    #[test]
    fn test_missing_required_field_rejected() {
        let mut value = serde_json::to_value(valid_case()).unwrap();
        value.as_object_mut().unwrap().remove("deadlines");
        let err = validator().validate_value(&value, "candidate").unwrap_err();
        assert!(err.violation_count() >= 1);
    }

    #[test]
    fn test_collects_every_semantic_violation() {
        let mut case = valid_case();
        case.requester.name = " ".to_string();
        case.requester.email = Some("a@b".to_string());
        case.deadlines.t10 = case.intake.received_at - TimeDelta::days(1);
        let err = validator().validate_case(case).unwrap_err();
        assert_eq!(err.violation_count(), 3);
        assert!(err.to_string().contains("/requester/email"));
    }

    #[test]
    fn test_yaml_roundtrip_revalidates() {
        let case = valid_case();
        let yaml = serde_yml::to_string(&case).unwrap();
        let reloaded = validator()
            .validate_yaml(&yaml, "PRR-2026-7KQ4.prr.yaml")
            .unwrap();
        assert_eq!(reloaded, case);
    }

    #[test]
    fn test_yaml_syntax_error_is_reported() {
        let err = validator()
            .validate_yaml("case_id: [unclosed", "broken.prr.yaml")
            .unwrap_err();
        assert!(matches!(err, CheckError::Yaml(_)));
        assert_eq!(err.violation_count(), 1);
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("dana@example.org"));
        assert!(is_valid_email("first.last+prr@city.gov.us"));
        assert!(!is_valid_email("dana@"));
        assert!(!is_valid_email("@example.org"));
        assert!(!is_valid_email("dana@example"));
        assert!(!is_valid_email("dana @example.org"));
        assert!(!is_valid_email("dana@@example.org"));
        assert!(!is_valid_email("dana@-example.org"));
        assert!(!is_valid_email("dana..w@example.org"));
    }

    #[test]
    fn test_free_function_uses_embedded_schema() {
        assert!(validate_case(valid_case()).is_ok());
    }
}
