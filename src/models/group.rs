//! Group model and request types.

use serde::{Deserialize, Serialize};

use super::RollState;

/// Comparison operator for a group's incident threshold ("less than" / "more than").
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Ltmt {
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = ">")]
    GreaterThan,
}

impl Ltmt {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ltmt::LessThan => "<",
            Ltmt::GreaterThan => ">",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "<" => Some(Ltmt::LessThan),
            ">" => Some(Ltmt::GreaterThan),
            _ => None,
        }
    }
}

/// A named cohort of students subject to attendance-filter rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub number_of_weeks: i32,
    pub roll_states: RollState,
    pub incidents: i32,
    pub ltmt: Ltmt,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_at: Option<String>,
    pub student_count: i32,
}

/// Request body for creating a group.
///
/// Enum-valued fields arrive as strings and are validated in the handler so
/// that out-of-enum values fail with a proper validation error instead of
/// being silently dropped.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    pub number_of_weeks: i32,
    pub roll_states: String,
    pub incidents: i32,
    pub ltmt: String,
    #[serde(default)]
    pub run_at: Option<String>,
    #[serde(default)]
    pub student_count: i32,
}

/// Request body for updating a group. Absent fields keep their current value;
/// an explicit `null` is treated the same as absent, so `run_at` cannot be
/// cleared once set.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateGroupRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub number_of_weeks: Option<i32>,
    #[serde(default)]
    pub roll_states: Option<String>,
    #[serde(default)]
    pub incidents: Option<i32>,
    #[serde(default)]
    pub ltmt: Option<String>,
    #[serde(default)]
    pub run_at: Option<String>,
    #[serde(default)]
    pub student_count: Option<i32>,
}
