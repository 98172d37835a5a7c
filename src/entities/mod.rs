//! Record types persisted by the case store

pub mod case;

pub use case::{AuditEntry, CaseRecord, Deadlines, Intake, Requester, StatusChange};
