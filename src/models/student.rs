//! Student model and request types.

use serde::{Deserialize, Serialize};

/// A student known to the school.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// A student listed as a member of a group, with the computed full name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMember {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub full_name: String,
}

/// Request body for creating a student.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStudentRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Request body for updating a student. Absent fields keep their current
/// value; an explicit `null` is treated the same as absent, so `photo_url`
/// cannot be cleared once set.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStudentRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}
