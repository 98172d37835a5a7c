//! Case lifecycle engine
//!
//! Creates cases from intake input and records actions against them. Every
//! action appends to the audit log; nothing here removes or rewrites an
//! existing entry. Status changes are checked against a transition table
//! unless the engine is configured as permissive. Terminal states (`CLOSED`,
//! `ERROR`) reject status changes in either mode, though audit-only entries
//! may still be appended to them.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::calendar::{BusinessCalendar, CalendarError};
use crate::core::clock::{Clock, SystemClock};
use crate::core::entity::{CaseStatus, Channel};
use crate::core::identity::{CaseId, IdGenerator, RandomIdGenerator};
use crate::entities::{AuditEntry, CaseRecord, Deadlines, Intake, Requester, StatusChange};
use crate::schema::validator::{requester_violations, ValidationError, Violation};

/// Audit action recorded for self-service submissions
pub const ACTION_SUBMITTED: &str = "submitted";

/// Audit action recorded when staff key in a request
pub const ACTION_INTAKE_CREATED: &str = "intake_created";

/// Lifecycle settings from project config
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Deployment tag stamped on new cases
    pub environment: String,

    /// Module tag stamped on new cases
    pub module: String,

    /// Allow any status change between open states (default: false)
    pub permissive_transitions: bool,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            environment: "production".to_string(),
            module: "public-records".to_string(),
            permissive_transitions: false,
        }
    }
}

/// Errors that can occur during lifecycle operations
#[derive(Debug, Error, miette::Diagnostic)]
pub enum LifecycleError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid argument: {0}")]
    #[diagnostic(code(prr::lifecycle::invalid_argument))]
    InvalidArgument(String),

    #[error("Illegal status transition: {from} → {to}")]
    #[diagnostic(
        code(prr::lifecycle::illegal_transition),
        help("Allowed from {from}: {allowed}")
    )]
    IllegalTransition {
        from: CaseStatus,
        to: CaseStatus,
        allowed: String,
    },

    #[error("Case is in terminal status {status}; its status can no longer change")]
    #[diagnostic(code(prr::lifecycle::terminal))]
    TerminalState { status: CaseStatus },

    #[error(transparent)]
    #[diagnostic(code(prr::lifecycle::calendar))]
    Calendar(#[from] CalendarError),
}

/// What a new request looks like before it becomes a case
#[derive(Debug, Clone)]
pub struct IntakeInput {
    pub requester: Requester,
    pub channel: Channel,
    pub request_text: String,
    pub legal_notice_accepted: bool,
    /// Receipt time; `None` means now
    pub received_at: Option<DateTime<Utc>>,
    /// Who entered the request (the resident for self-service)
    pub actor: String,
}

impl IntakeInput {
    pub fn new(
        requester: Requester,
        channel: Channel,
        request_text: impl Into<String>,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            requester,
            channel,
            request_text: request_text.into(),
            legal_notice_accepted: false,
            received_at: None,
            actor: actor.into(),
        }
    }

    pub fn with_notice_accepted(mut self, accepted: bool) -> Self {
        self.legal_notice_accepted = accepted;
        self
    }

    pub fn received_at(mut self, at: DateTime<Utc>) -> Self {
        self.received_at = Some(at);
        self
    }

    /// Collect every problem with this input
    pub fn violations(&self) -> Vec<Violation> {
        let mut violations = requester_violations(&self.requester);
        if self.request_text.trim().is_empty() {
            violations.push(Violation::new(
                "/intake/request_text",
                "request text must not be empty",
            ));
        }
        if self.actor.trim().is_empty() {
            violations.push(Violation::new("/audit_log/0/actor", "actor must not be empty"));
        }
        violations
    }
}

/// An action to append to a case's audit log
#[derive(Debug, Clone)]
pub struct ActionRequest {
    pub actor: String,
    pub action: String,
    pub detail: Option<String>,
    pub target_status: Option<CaseStatus>,
}

impl ActionRequest {
    pub fn new(actor: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            action: action.into(),
            detail: None,
            target_status: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_status(mut self, status: CaseStatus) -> Self {
        self.target_status = Some(status);
        self
    }
}

/// Lifecycle engine for creating cases and recording actions
pub struct LifecycleEngine {
    config: LifecycleConfig,
    calendar: BusinessCalendar,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
}

impl LifecycleEngine {
    /// Engine on the wall clock with random identifiers
    pub fn new(config: LifecycleConfig, calendar: BusinessCalendar) -> Self {
        Self {
            config,
            calendar,
            clock: Box::new(SystemClock),
            ids: Box::new(RandomIdGenerator),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    pub fn calendar(&self) -> &BusinessCalendar {
        &self.calendar
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Check the transition table, ignoring permissive mode
    pub fn is_valid_transition(&self, from: CaseStatus, to: CaseStatus) -> bool {
        use CaseStatus::*;
        matches!(
            (from, to),
            // Normal forward progression
            (Created, Intake)
                | (Intake, TimerCompute)
                | (TimerCompute, Assessment)
                | (Assessment, Gather)
                | (Gather, Package)
                | (Package, Delivery)
                | (Delivery, Closed)
                // Nothing responsive: close straight from assessment
                | (Assessment, Closed)
        ) || (to == Error && !from.is_terminal())
    }

    /// Get allowed transitions from the current status
    pub fn allowed_transitions(&self, current: CaseStatus) -> Vec<CaseStatus> {
        if current.is_terminal() {
            return Vec::new();
        }
        CaseStatus::all()
            .iter()
            .copied()
            .filter(|&to| {
                to != current && (self.config.permissive_transitions || self.is_valid_transition(current, to))
            })
            .collect()
    }

    /// Check if a status change is allowed under the current configuration
    pub fn can_transition(&self, from: CaseStatus, to: CaseStatus) -> Result<(), LifecycleError> {
        if from.is_terminal() {
            return Err(LifecycleError::TerminalState { status: from });
        }
        if self.config.permissive_transitions || self.is_valid_transition(from, to) {
            return Ok(());
        }

        let allowed = self
            .allowed_transitions(from)
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Err(LifecycleError::IllegalTransition { from, to, allowed })
    }

    /// Draw a fresh identifier for a request received at `received_at`
    pub fn generate_id(&self, received_at: DateTime<Utc>) -> CaseId {
        self.ids.generate(received_at.year())
    }

    /// Create a case from intake input with a freshly generated identifier
    pub fn create_case(&self, input: IntakeInput) -> Result<CaseRecord, LifecycleError> {
        let received_at = input.received_at.unwrap_or_else(|| self.clock.now());
        let case_id = self.generate_id(received_at);
        self.create_case_with_id(input.received_at(received_at), case_id)
    }

    /// Create a case under a caller-chosen identifier
    ///
    /// Input is validated before anything is built; on failure no record
    /// exists.
    pub fn create_case_with_id(
        &self,
        input: IntakeInput,
        case_id: CaseId,
    ) -> Result<CaseRecord, LifecycleError> {
        let violations = input.violations();
        if !violations.is_empty() {
            return Err(ValidationError::new("intake", violations).into());
        }

        let now = self.clock.now();
        let received_at = input.received_at.unwrap_or(now);
        let t10 = self.calendar.compute_t10(received_at)?;

        let action = if input.channel.is_staff_intake() {
            ACTION_INTAKE_CREATED
        } else {
            ACTION_SUBMITTED
        };
        let detail = input
            .channel
            .is_staff_intake()
            .then(|| format!("via {}", input.channel));

        let case = CaseRecord {
            case_id,
            environment: self.config.environment.clone(),
            module: self.config.module.clone(),
            status: CaseStatus::Intake,
            requester: input.requester,
            intake: Intake {
                received_at,
                channel: input.channel,
                request_text: input.request_text,
                legal_notice_accepted: input.legal_notice_accepted,
            },
            deadlines: Deadlines { t10 },
            audit_log: vec![AuditEntry {
                at: now,
                actor: input.actor,
                action: action.to_string(),
                detail,
                transition: Some(StatusChange {
                    from: CaseStatus::Created,
                    to: CaseStatus::Intake,
                }),
            }],
            version: 1,
        };

        info!(
            case_id = %case.case_id,
            channel = %case.intake.channel,
            t10 = %case.deadlines.t10.to_rfc3339(),
            "case created"
        );
        Ok(case)
    }

    /// Append an action to the audit log, optionally changing status
    ///
    /// The entry's timestamp never precedes the previous entry's, so the log
    /// stays chronological even if the clock steps backwards.
    pub fn record_action(
        &self,
        mut case: CaseRecord,
        request: ActionRequest,
    ) -> Result<CaseRecord, LifecycleError> {
        if request.actor.trim().is_empty() {
            return Err(LifecycleError::InvalidArgument(
                "actor must not be empty".to_string(),
            ));
        }
        if request.action.trim().is_empty() {
            return Err(LifecycleError::InvalidArgument(
                "action must not be empty".to_string(),
            ));
        }

        let transition = match request.target_status {
            Some(to) if to != case.status => {
                self.can_transition(case.status, to)?;
                Some(StatusChange {
                    from: case.status,
                    to,
                })
            }
            _ => None,
        };

        let version = case.version.checked_add(1).ok_or_else(|| {
            LifecycleError::InvalidArgument(format!(
                "{} is at the highest version and cannot record more actions",
                case.case_id
            ))
        })?;

        let now = self.clock.now();
        let at = case.last_entry().map_or(now, |last| now.max(last.at));

        case.audit_log.push(AuditEntry {
            at,
            actor: request.actor,
            action: request.action,
            detail: request.detail,
            transition,
        });
        if let Some(change) = transition {
            case.status = change.to;
        }
        case.version = version;

        debug!(
            case_id = %case.case_id,
            status = %case.status,
            entries = case.audit_log.len(),
            "action recorded"
        );
        Ok(case)
    }
}
