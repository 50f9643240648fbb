//! Roll state types and the homeboard view model.

use serde::{Deserialize, Serialize};

/// Attendance state of a student during a roll call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RollState {
    Unmark,
    Present,
    Absent,
    Late,
}

impl RollState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RollState::Unmark => "unmark",
            RollState::Present => "present",
            RollState::Absent => "absent",
            RollState::Late => "late",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "unmark" => Some(RollState::Unmark),
            "present" => Some(RollState::Present),
            "absent" => Some(RollState::Absent),
            "late" => Some(RollState::Late),
            _ => None,
        }
    }
}

/// Homeboard view model: a student plus their transient roll state.
///
/// The roll state is never persisted; it lives in the active roll session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(rename = "type")]
    pub roll_state: RollState,
}

impl Person {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Metadata for a started roll session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollInfo {
    pub id: String,
    pub started_at: String,
}

/// Status counts shown in the active roll overlay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RollSummary {
    pub all: usize,
    pub present: usize,
    pub late: usize,
    pub absent: usize,
}

/// Request body for marking a student during an active roll.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkStudentRequest {
    pub student_id: i64,
    /// One of "unmark", "present", "absent", "late"; validated in the handler.
    pub state: String,
}
