//! Public records request case record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{CaseStatus, Channel};
use crate::core::identity::CaseId;

/// Person who made the request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// How, when and what was requested
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intake {
    pub received_at: DateTime<Utc>,

    pub channel: Channel,

    /// The request as the requester worded it
    pub request_text: String,

    /// Requester acknowledged the public-records legal notice
    pub legal_notice_accepted: bool,
}

/// Statutory deadlines, fixed at intake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deadlines {
    pub t10: DateTime<Utc>,
}

/// Status change carried by an audit entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub from: CaseStatus,
    pub to: CaseStatus,
}

/// One line of the append-only audit trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub at: DateTime<Utc>,

    pub actor: String,

    pub action: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<StatusChange>,
}

/// A public records request moving through the case lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub case_id: CaseId,

    /// Deployment tag, fixed at creation
    pub environment: String,

    /// Owning module tag, fixed at creation
    pub module: String,

    pub status: CaseStatus,

    pub requester: Requester,

    pub intake: Intake,

    pub deadlines: Deadlines,

    /// Chronological, append-only
    pub audit_log: Vec<AuditEntry>,

    /// Optimistic-concurrency token; bumped by every recorded action
    #[serde(default = "default_version")]
    pub version: u64,
}

fn default_version() -> u64 {
    1
}

impl CaseRecord {
    /// Most recent audit entry
    pub fn last_entry(&self) -> Option<&AuditEntry> {
        self.audit_log.last()
    }

    /// Short label for list output: the first line of the request text
    pub fn summary(&self) -> &str {
        self.intake.request_text.lines().next().unwrap_or("").trim()
    }

    /// Whether the case is still being worked
    pub fn is_open(&self) -> bool {
        !self.status.is_terminal()
    }
}
