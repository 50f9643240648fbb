//! Homeboard API endpoint.
//!
//! Serves the staff daily-care board: the full student list with transient
//! roll states merged in, searchable, filterable and sortable.

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::models::{Person, RollState};
use crate::roll::{self, SortKey, SortOrder, StateFilter};
use crate::AppState;

/// Homeboard query parameters.
#[derive(Debug, Deserialize)]
pub struct HomeboardQuery {
    /// Substring to match against full names (case-insensitive, trimmed).
    #[serde(default)]
    pub search: Option<String>,
    /// Sort key: "first_name" (default) or "last_name".
    #[serde(default)]
    pub sort_by: Option<String>,
    /// Sort direction: "asc" (default) or "desc".
    #[serde(default)]
    pub order: Option<String>,
    /// Roll-state filter: "all" (default), "unmark", "present", "absent", "late".
    #[serde(default)]
    pub roll_state: Option<String>,
}

/// Homeboard response, matching the original `get-homeboard-students` shape.
#[derive(Debug, Serialize)]
pub struct HomeboardResponse {
    pub students: Vec<Person>,
}

/// GET /api/homeboard/students - List students for the homeboard.
pub async fn get_homeboard_students(
    State(state): State<AppState>,
    Query(params): Query<HomeboardQuery>,
) -> ApiResult<HomeboardResponse> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let sort_key = match params.sort_by.as_deref() {
        None => SortKey::FirstName,
        Some(s) => match SortKey::from_str(s) {
            Some(key) => key,
            None => {
                return error(
                    AppError::Validation(format!(
                        "Invalid sort_by '{}': expected 'first_name' or 'last_name'",
                        s
                    )),
                    revision_id,
                )
            }
        },
    };

    let order = match params.order.as_deref() {
        None => SortOrder::Asc,
        Some(s) => match SortOrder::from_str(s) {
            Some(order) => order,
            None => {
                return error(
                    AppError::Validation(format!(
                        "Invalid order '{}': expected 'asc' or 'desc'",
                        s
                    )),
                    revision_id,
                )
            }
        },
    };

    let filter = match params.roll_state.as_deref() {
        None => StateFilter::All,
        Some(s) => match StateFilter::from_str(s) {
            Some(filter) => filter,
            None => {
                return error(
                    AppError::Validation(format!(
                        "Invalid roll_state '{}': expected one of all, unmark, present, absent, late",
                        s
                    )),
                    revision_id,
                )
            }
        },
    };

    let students = match state.repo.list_students().await {
        Ok(students) => students,
        Err(e) => return error(e, revision_id),
    };

    // Merge transient marks from the active roll session; unmarked by default.
    let marks = state.roll.marks().await;
    let mut people: Vec<Person> = students
        .into_iter()
        .map(|s| {
            let roll_state = marks.get(&s.id).copied().unwrap_or(RollState::Unmark);
            Person {
                id: s.id,
                first_name: s.first_name,
                last_name: s.last_name,
                photo_url: s.photo_url,
                roll_state,
            }
        })
        .collect();

    if let Some(query) = &params.search {
        people = roll::search_students(people, query);
    }
    people = roll::filter_students(people, filter);
    roll::sort_students(&mut people, sort_key, order);

    success(HomeboardResponse { students: people }, revision_id)
}
