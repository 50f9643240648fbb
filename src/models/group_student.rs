//! Group-student membership model and request types.

use serde::{Deserialize, Serialize};

/// Join entity linking a student to a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupStudent {
    pub id: i64,
    pub group_id: i64,
    pub student_id: i64,
    pub incident_count: i32,
}

/// Request body for adding a single student to a group.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGroupStudentRequest {
    pub group_id: i64,
    pub student_id: i64,
    #[serde(default)]
    pub incident_count: i32,
}

/// Request body for adding several students to groups in one call.
#[derive(Debug, Clone, Deserialize)]
pub struct AddGroupStudentsRequest {
    pub members: Vec<CreateGroupStudentRequest>,
}
