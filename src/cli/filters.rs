//! Filter and selector enums for CLI commands

use clap::ValueEnum;

use crate::core::entity::{CaseStatus, Channel};

/// Status filter for list commands
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// Every non-terminal status - default
    #[default]
    Open,
    Intake,
    TimerCompute,
    Assessment,
    Gather,
    Package,
    Delivery,
    Closed,
    Error,
    /// Closed or error
    Terminal,
    /// All statuses
    All,
}

impl StatusFilter {
    /// Statuses this filter accepts; empty means any
    pub fn statuses(&self) -> Vec<CaseStatus> {
        match self {
            StatusFilter::Open => CaseStatus::all()
                .iter()
                .copied()
                .filter(|s| !s.is_terminal())
                .collect(),
            StatusFilter::Intake => vec![CaseStatus::Intake],
            StatusFilter::TimerCompute => vec![CaseStatus::TimerCompute],
            StatusFilter::Assessment => vec![CaseStatus::Assessment],
            StatusFilter::Gather => vec![CaseStatus::Gather],
            StatusFilter::Package => vec![CaseStatus::Package],
            StatusFilter::Delivery => vec![CaseStatus::Delivery],
            StatusFilter::Closed => vec![CaseStatus::Closed],
            StatusFilter::Error => vec![CaseStatus::Error],
            StatusFilter::Terminal => vec![CaseStatus::Closed, CaseStatus::Error],
            StatusFilter::All => Vec::new(),
        }
    }
}

/// Intake channel selector
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum ChannelArg {
    ResidentForm,
    Email,
    Phone,
    InPerson,
    /// Entered by staff - default for the CLI
    #[default]
    Staff,
}

impl From<ChannelArg> for Channel {
    fn from(arg: ChannelArg) -> Self {
        match arg {
            ChannelArg::ResidentForm => Channel::ResidentForm,
            ChannelArg::Email => Channel::Email,
            ChannelArg::Phone => Channel::Phone,
            ChannelArg::InPerson => Channel::InPerson,
            ChannelArg::Staff => Channel::Staff,
        }
    }
}

/// Parse a status argument (`gather`, `TIMER_COMPUTE`, `timer-compute`)
pub fn parse_status(s: &str) -> Result<CaseStatus, String> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_filter_excludes_terminal() {
        let open = StatusFilter::Open.statuses();
        assert!(open.contains(&CaseStatus::Intake));
        assert!(open.contains(&CaseStatus::Delivery));
        assert!(!open.contains(&CaseStatus::Closed));
        assert!(!open.contains(&CaseStatus::Error));
    }

    #[test]
    fn test_terminal_and_all() {
        let terminal = StatusFilter::Terminal.statuses();
        assert!(terminal.contains(&CaseStatus::Error));
        assert!(!terminal.contains(&CaseStatus::Gather));
        assert!(StatusFilter::All.statuses().is_empty());
    }

    #[test]
    fn test_channel_conversion() {
        assert_eq!(Channel::from(ChannelArg::InPerson), Channel::InPerson);
        assert_eq!(Channel::from(ChannelArg::default()), Channel::Staff);
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("gather"), Ok(CaseStatus::Gather));
        assert_eq!(parse_status("timer-compute"), Ok(CaseStatus::TimerCompute));
        assert!(parse_status("archived").is_err());
    }
}
