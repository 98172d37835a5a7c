//! PRR Casework: public records request intake and deadline tracking
//!
//! Cases live as plain-text YAML files under a project directory. The
//! library computes statutory business-day deadlines, enforces the case
//! lifecycle, and keeps an append-only audit log on every record.

pub mod cli;
pub mod core;
pub mod entities;
pub mod schema;
pub mod yaml;
