//! Enumerations shared by case records, filters and the lifecycle engine

/// Lifecycle stage of a case
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[derive(Default)]
pub enum CaseStatus {
    #[default]
    Created,
    Intake,
    TimerCompute,
    Assessment,
    Gather,
    Package,
    Delivery,
    Closed,
    /// Abnormal termination, reachable from any open stage
    Error,
}

impl CaseStatus {
    /// Every status in intended progression order, `ERROR` last
    pub fn all() -> &'static [CaseStatus] {
        &[
            CaseStatus::Created,
            CaseStatus::Intake,
            CaseStatus::TimerCompute,
            CaseStatus::Assessment,
            CaseStatus::Gather,
            CaseStatus::Package,
            CaseStatus::Delivery,
            CaseStatus::Closed,
            CaseStatus::Error,
        ]
    }

    /// `CLOSED` and `ERROR` accept no further status changes
    pub fn is_terminal(&self) -> bool {
        matches!(self, CaseStatus::Closed | CaseStatus::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Created => "CREATED",
            CaseStatus::Intake => "INTAKE",
            CaseStatus::TimerCompute => "TIMER_COMPUTE",
            CaseStatus::Assessment => "ASSESSMENT",
            CaseStatus::Gather => "GATHER",
            CaseStatus::Package => "PACKAGE",
            CaseStatus::Delivery => "DELIVERY",
            CaseStatus::Closed => "CLOSED",
            CaseStatus::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CaseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('-', "_");
        CaseStatus::all()
            .iter()
            .find(|status| status.as_str() == normalized)
            .copied()
            .ok_or_else(|| format!("Unknown status: {}", s))
    }
}

/// How a request reached the records office
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[derive(Default)]
pub enum Channel {
    /// Self-service submission by the resident
    #[default]
    ResidentForm,
    Email,
    Phone,
    InPerson,
    /// Entered by staff with no other channel recorded
    Staff,
}

impl Channel {
    pub fn all() -> &'static [Channel] {
        &[
            Channel::ResidentForm,
            Channel::Email,
            Channel::Phone,
            Channel::InPerson,
            Channel::Staff,
        ]
    }

    /// Whether the record was keyed in by staff rather than the requester
    pub fn is_staff_intake(&self) -> bool {
        !matches!(self, Channel::ResidentForm)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::ResidentForm => "RESIDENT_FORM",
            Channel::Email => "EMAIL",
            Channel::Phone => "PHONE",
            Channel::InPerson => "IN_PERSON",
            Channel::Staff => "STAFF",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('-', "_");
        Channel::all()
            .iter()
            .find(|channel| channel.as_str() == normalized)
            .copied()
            .ok_or_else(|| format!("Unknown channel: {}", s))
    }
}
