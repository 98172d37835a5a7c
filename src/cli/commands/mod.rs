//! CLI command implementations

pub mod act;
pub mod completions;
pub mod deadline;
pub mod init;
pub mod list;
pub mod log;
pub mod new;
pub mod show;
pub mod validate;
