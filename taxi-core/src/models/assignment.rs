use serde::{Deserialize, Serialize};

/// Membership of one (driver, car) pair in the assignment relation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentState {
    Assigned,
    Unassigned,
}

impl AssignmentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::Unassigned => "unassigned",
        }
    }

    pub fn is_assigned(&self) -> bool {
        matches!(self, Self::Assigned)
    }
}
