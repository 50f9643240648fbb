//! Group API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::models::{CreateGroupRequest, Group, UpdateGroupRequest};
use crate::AppState;

/// GET /api/groups - List all groups.
pub async fn list_groups(State(state): State<AppState>) -> ApiResult<Vec<Group>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_groups().await {
        Ok(groups) => success(groups, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/groups/:id - Get a single group.
pub async fn get_group(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Group> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_group(id).await {
        Ok(Some(group)) => success(group, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Group {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/groups - Create a new group.
pub async fn create_group(
    State(state): State<AppState>,
    Json(request): Json<CreateGroupRequest>,
) -> ApiResult<Group> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    // Validate required fields
    if request.name.trim().is_empty() {
        return error(
            AppError::Validation("Name is required".to_string()),
            revision_id,
        );
    }

    match state.repo.create_group(&request).await {
        Ok(group) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(group, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/groups/:id - Update a group.
pub async fn update_group(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateGroupRequest>,
) -> ApiResult<Group> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if let Some(name) = &request.name {
        if name.trim().is_empty() {
            return error(
                AppError::Validation("Name must not be empty".to_string()),
                revision_id,
            );
        }
    }

    match state.repo.update_group(id, &request).await {
        Ok(group) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(group, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/groups/:id - Delete a group and its memberships.
pub async fn delete_group(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_group(id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
