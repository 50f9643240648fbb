//! Group-student membership API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::models::{
    AddGroupStudentsRequest, CreateGroupStudentRequest, GroupMember, GroupStudent,
};
use crate::AppState;

/// POST /api/group-students - Add a single student to a group.
pub async fn add_group_student(
    State(state): State<AppState>,
    Json(request): Json<CreateGroupStudentRequest>,
) -> ApiResult<GroupStudent> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.add_group_student(&request).await {
        Ok(group_student) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(group_student, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/group-students/batch - Add several students to groups at once.
pub async fn add_group_students(
    State(state): State<AppState>,
    Json(request): Json<AddGroupStudentsRequest>,
) -> ApiResult<Vec<GroupStudent>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if request.members.is_empty() {
        return error(
            AppError::Validation("No members provided".to_string()),
            revision_id,
        );
    }

    match state.repo.add_group_students(&request.members).await {
        Ok(group_students) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(group_students, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/groups/:id/students - List the students that are in a group.
pub async fn list_group_members(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
) -> ApiResult<Vec<GroupMember>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_group_members(group_id).await {
        Ok(members) => success(members, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/group-students/:id - Remove a membership.
pub async fn delete_group_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_group_student(id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
