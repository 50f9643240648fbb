//! Roll session API endpoints.

use axum::{extract::State, Json};

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::models::{MarkStudentRequest, RollInfo, RollState, RollSummary};
use crate::AppState;

/// POST /api/roll/start - Start a roll, replacing any active one.
pub async fn start_roll(State(state): State<AppState>) -> ApiResult<RollInfo> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if let Some(previous) = state.roll.active().await {
        tracing::info!("Replacing active roll {}", previous.id);
    }

    let info = state.roll.start().await;
    tracing::info!("Roll {} started", info.id);
    success(info, revision_id)
}

/// POST /api/roll/mark - Mark a student's state in the active roll.
pub async fn mark_student(
    State(state): State<AppState>,
    Json(request): Json<MarkStudentRequest>,
) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let roll_state = match RollState::from_str(&request.state) {
        Some(roll_state) => roll_state,
        None => {
            return error(
                AppError::Validation(format!(
                    "Invalid state '{}': expected one of unmark, present, absent, late",
                    request.state
                )),
                revision_id,
            )
        }
    };

    match state.repo.get_student(request.student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return error(
                AppError::NotFound(format!("Student {} not found", request.student_id)),
                revision_id,
            )
        }
        Err(e) => return error(e, revision_id),
    }

    match state.roll.mark(request.student_id, roll_state).await {
        Ok(()) => success((), revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/roll/summary - Status counts for the active roll.
pub async fn get_roll_summary(State(state): State<AppState>) -> ApiResult<RollSummary> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let total = match state.repo.count_students().await {
        Ok(total) => total,
        Err(e) => return error(e, revision_id),
    };

    match state.roll.summary(total).await {
        Ok(summary) => success(summary, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/roll/complete - End the active roll and return the final counts.
pub async fn complete_roll(State(state): State<AppState>) -> ApiResult<RollSummary> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let total = match state.repo.count_students().await {
        Ok(total) => total,
        Err(e) => return error(e, revision_id),
    };

    match state.roll.complete(total).await {
        Ok(summary) => {
            tracing::info!(
                "Roll completed: {} present, {} late, {} absent of {}",
                summary.present,
                summary.late,
                summary.absent,
                summary.all
            );
            success(summary, revision_id)
        }
        Err(e) => error(e, revision_id),
    }
}
