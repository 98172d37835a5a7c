//! Core module - fundamental types and utilities

pub mod calendar;
pub mod clock;
pub mod config;
pub mod desk;
pub mod entity;
pub mod identity;
pub mod lifecycle;
pub mod project;
pub mod shortid;
pub mod store;

pub use calendar::{add_business_days, compute_t10, is_business_day, BusinessCalendar, CalendarError};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use desk::{CaseDesk, DeskError};
pub use entity::{CaseStatus, Channel};
pub use identity::{CaseId, IdGenerator, IdParseError, RandomIdGenerator, SequenceIdGenerator};
pub use lifecycle::{
    ActionRequest, IntakeInput, LifecycleConfig, LifecycleEngine, LifecycleError,
};
pub use project::{Project, ProjectError};
pub use shortid::ShortIdIndex;
pub use store::{CaseFilter, CaseStore, MemoryCaseStore, StoreError, YamlCaseStore};
