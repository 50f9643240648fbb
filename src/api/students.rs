//! Student API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::models::{CreateStudentRequest, Student, UpdateStudentRequest};
use crate::AppState;

/// GET /api/students - List all students.
pub async fn list_students(State(state): State<AppState>) -> ApiResult<Vec<Student>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_students().await {
        Ok(students) => success(students, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/students/:id - Get a single student.
pub async fn get_student(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Student> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_student(id).await {
        Ok(Some(student)) => success(student, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Student {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/students - Create a new student.
pub async fn create_student(
    State(state): State<AppState>,
    Json(request): Json<CreateStudentRequest>,
) -> ApiResult<Student> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    // Validate required fields
    if request.first_name.trim().is_empty() {
        return error(
            AppError::Validation("First name is required".to_string()),
            revision_id,
        );
    }
    if request.last_name.trim().is_empty() {
        return error(
            AppError::Validation("Last name is required".to_string()),
            revision_id,
        );
    }

    match state.repo.create_student(&request).await {
        Ok(student) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(student, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/students/:id - Update a student.
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateStudentRequest>,
) -> ApiResult<Student> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if let Some(first_name) = &request.first_name {
        if first_name.trim().is_empty() {
            return error(
                AppError::Validation("First name must not be empty".to_string()),
                revision_id,
            );
        }
    }
    if let Some(last_name) = &request.last_name {
        if last_name.trim().is_empty() {
            return error(
                AppError::Validation("Last name must not be empty".to_string()),
                revision_id,
            );
        }
    }

    match state.repo.update_student(id, &request).await {
        Ok(student) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(student, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/students/:id - Delete a student.
pub async fn delete_student(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_student(id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
