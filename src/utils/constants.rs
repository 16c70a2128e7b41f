use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulingCode {
    SchedulableSimulated = 0,
    SchedulableShortcut = 1,
    UnschedulableSimulated = 2,
    UnschedulableShortcut = 3,
    CannotTell = 4,
}

impl SchedulingCode {
    pub fn is_schedulable(&self) -> bool {
        matches!(self, SchedulingCode::SchedulableSimulated | SchedulingCode::SchedulableShortcut)
    }
}

/// Which deadline orders jobs by priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeadlineKey {
    /// The job's absolute deadline (release + relative deadline).
    #[default]
    Absolute,
    /// The owning task's relative deadline, i.e. fixed task priorities.
    Relative,
}

/// The scheduling policies the host can pick at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicyKind {
    #[default]
    DeadlineMonotonic,
    RelativeDeadlineMonotonic,
}

impl PolicyKind {
    pub const NAMES: [&'static str; 2] = ["dm", "dm-relative"];

    pub fn deadline_key(&self) -> DeadlineKey {
        match self {
            PolicyKind::DeadlineMonotonic => DeadlineKey::Absolute,
            PolicyKind::RelativeDeadlineMonotonic => DeadlineKey::Relative,
        }
    }
}

impl FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dm" => Ok(PolicyKind::DeadlineMonotonic),
            "dm-relative" => Ok(PolicyKind::RelativeDeadlineMonotonic),
            other => Err(format!("unknown policy '{}'", other)),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PolicyKind::DeadlineMonotonic => write!(f, "dm"),
            PolicyKind::RelativeDeadlineMonotonic => write!(f, "dm-relative"),
        }
    }
}
