//! In-memory roll session and homeboard list operations.
//!
//! Roll marks are transient: they live only for the duration of the active
//! roll session and are never persisted.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::{Person, RollInfo, RollState, RollSummary};

/// Sort key for the homeboard student list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    FirstName,
    LastName,
}

impl SortKey {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "first_name" => Some(SortKey::FirstName),
            "last_name" => Some(SortKey::LastName),
            _ => None,
        }
    }
}

/// Sort direction for the homeboard student list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// Roll-state filter for the homeboard list.
///
/// `all` and `unmark` reset to the unfiltered list; only present, absent and
/// late narrow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateFilter {
    All,
    State(RollState),
}

impl StateFilter {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "all" => Some(StateFilter::All),
            _ => RollState::from_str(s).map(StateFilter::State),
        }
    }
}

/// A single active roll call with per-student marks.
struct ActiveRoll {
    id: String,
    started_at: String,
    marks: HashMap<i64, RollState>,
}

/// Process-local roll session state shared across handlers.
///
/// At most one roll is active at a time; starting a new roll replaces any
/// active one.
pub struct RollSession {
    inner: RwLock<Option<ActiveRoll>>,
}

impl RollSession {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }

    /// Start a roll, replacing any active one.
    pub async fn start(&self) -> RollInfo {
        let info = RollInfo {
            id: uuid::Uuid::new_v4().to_string(),
            started_at: Utc::now().to_rfc3339(),
        };
        let mut guard = self.inner.write().await;
        *guard = Some(ActiveRoll {
            id: info.id.clone(),
            started_at: info.started_at.clone(),
            marks: HashMap::new(),
        });
        info
    }

    /// Metadata for the active roll, if any.
    pub async fn active(&self) -> Option<RollInfo> {
        self.inner.read().await.as_ref().map(|roll| RollInfo {
            id: roll.id.clone(),
            started_at: roll.started_at.clone(),
        })
    }

    /// Record a student's roll state. Fails when no roll is active.
    pub async fn mark(&self, student_id: i64, state: RollState) -> Result<(), AppError> {
        let mut guard = self.inner.write().await;
        let roll = guard
            .as_mut()
            .ok_or_else(|| AppError::BadRequest("No active roll".to_string()))?;
        roll.marks.insert(student_id, state);
        Ok(())
    }

    /// Snapshot of the current marks. Empty when no roll is active.
    pub async fn marks(&self) -> HashMap<i64, RollState> {
        self.inner
            .read()
            .await
            .as_ref()
            .map(|roll| roll.marks.clone())
            .unwrap_or_default()
    }

    /// Status counts for the active roll. Fails when no roll is active.
    pub async fn summary(&self, total: usize) -> Result<RollSummary, AppError> {
        let guard = self.inner.read().await;
        let roll = guard
            .as_ref()
            .ok_or_else(|| AppError::BadRequest("No active roll".to_string()))?;
        Ok(summarize(&roll.marks, total))
    }

    /// End the active roll, clearing its marks and returning the final counts.
    pub async fn complete(&self, total: usize) -> Result<RollSummary, AppError> {
        let mut guard = self.inner.write().await;
        let roll = guard
            .take()
            .ok_or_else(|| AppError::BadRequest("No active roll".to_string()))?;
        Ok(summarize(&roll.marks, total))
    }
}

impl Default for RollSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute status counts from marks; `total` covers the whole student list.
pub fn summarize(marks: &HashMap<i64, RollState>, total: usize) -> RollSummary {
    let mut summary = RollSummary {
        all: total,
        present: 0,
        late: 0,
        absent: 0,
    };
    for state in marks.values() {
        match state {
            RollState::Present => summary.present += 1,
            RollState::Late => summary.late += 1,
            RollState::Absent => summary.absent += 1,
            RollState::Unmark => {}
        }
    }
    summary
}

/// Case-insensitive substring search over trimmed full names.
///
/// An empty or whitespace-only query matches everyone.
pub fn search_students(people: Vec<Person>, query: &str) -> Vec<Person> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return people;
    }
    people
        .into_iter()
        .filter(|p| p.full_name().to_lowercase().contains(&needle))
        .collect()
}

/// Narrow the list to one roll state; `all` and `unmark` leave it untouched.
pub fn filter_students(people: Vec<Person>, filter: StateFilter) -> Vec<Person> {
    match filter {
        StateFilter::All | StateFilter::State(RollState::Unmark) => people,
        StateFilter::State(state) => people
            .into_iter()
            .filter(|p| p.roll_state == state)
            .collect(),
    }
}

/// Sort the list by first or last name, ascending or descending.
pub fn sort_students(people: &mut [Person], key: SortKey, order: SortOrder) {
    people.sort_by(|a, b| {
        let ordering = match key {
            SortKey::FirstName => a.first_name.cmp(&b.first_name),
            SortKey::LastName => a.last_name.cmp(&b.last_name),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}
