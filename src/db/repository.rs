//! Database repository for CRUD operations.
//!
//! Uses prepared statements and transactions for data integrity.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    CreateGroupRequest, CreateGroupStudentRequest, CreateStudentRequest, Group, GroupMember,
    GroupStudent, Ltmt, RollState, Student, UpdateGroupRequest, UpdateStudentRequest,
};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the current revision ID.
    pub async fn get_revision_id(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT revision_id FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("revision_id"))
    }

    /// Increment the revision ID and return the new value.
    pub async fn increment_revision(&self) -> Result<i64, AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
            .bind(&now)
            .execute(&self.pool)
            .await?;
        self.get_revision_id().await
    }

    // ==================== GROUP OPERATIONS ====================

    /// List all groups.
    pub async fn list_groups(&self) -> Result<Vec<Group>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, number_of_weeks, roll_states, incidents, ltmt, run_at, student_count FROM groups ORDER BY name"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(group_from_row).collect())
    }

    /// Get a group by ID.
    pub async fn get_group(&self, id: i64) -> Result<Option<Group>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, number_of_weeks, roll_states, incidents, ltmt, run_at, student_count FROM groups WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(group_from_row))
    }

    /// Create a new group. Out-of-enum `roll_states`/`ltmt` values are rejected.
    pub async fn create_group(&self, request: &CreateGroupRequest) -> Result<Group, AppError> {
        let roll_states = parse_roll_states(&request.roll_states)?;
        let ltmt = parse_ltmt(&request.ltmt)?;

        let result = sqlx::query(
            "INSERT INTO groups (name, number_of_weeks, roll_states, incidents, ltmt, run_at, student_count) VALUES (?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&request.name)
        .bind(request.number_of_weeks)
        .bind(roll_states.as_str())
        .bind(request.incidents)
        .bind(ltmt.as_str())
        .bind(&request.run_at)
        .bind(request.student_count)
        .execute(&self.pool)
        .await?;

        self.increment_revision().await?;

        Ok(Group {
            id: result.last_insert_rowid(),
            name: request.name.clone(),
            number_of_weeks: request.number_of_weeks,
            roll_states,
            incidents: request.incidents,
            ltmt,
            run_at: request.run_at.clone(),
            student_count: request.student_count,
        })
    }

    /// Update a group. Absent fields keep their current values.
    pub async fn update_group(
        &self,
        id: i64,
        request: &UpdateGroupRequest,
    ) -> Result<Group, AppError> {
        let existing = self
            .get_group(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Group {} not found", id)))?;

        let roll_states = match &request.roll_states {
            Some(s) => parse_roll_states(s)?,
            None => existing.roll_states,
        };
        let ltmt = match &request.ltmt {
            Some(s) => parse_ltmt(s)?,
            None => existing.ltmt,
        };

        let name = request.name.as_ref().unwrap_or(&existing.name);
        let number_of_weeks = request.number_of_weeks.unwrap_or(existing.number_of_weeks);
        let incidents = request.incidents.unwrap_or(existing.incidents);
        let run_at = request.run_at.clone().or(existing.run_at.clone());
        let student_count = request.student_count.unwrap_or(existing.student_count);

        sqlx::query(
            "UPDATE groups SET name = ?, number_of_weeks = ?, roll_states = ?, incidents = ?, ltmt = ?, run_at = ?, student_count = ? WHERE id = ?"
        )
        .bind(name)
        .bind(number_of_weeks)
        .bind(roll_states.as_str())
        .bind(incidents)
        .bind(ltmt.as_str())
        .bind(&run_at)
        .bind(student_count)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.increment_revision().await?;

        Ok(Group {
            id,
            name: name.clone(),
            number_of_weeks,
            roll_states,
            incidents,
            ltmt,
            run_at,
            student_count,
        })
    }

    /// Delete a group. Memberships cascade via the foreign key.
    pub async fn delete_group(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM groups WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Group {} not found", id)));
        }

        self.increment_revision().await?;
        Ok(())
    }

    // ==================== STUDENT OPERATIONS ====================

    /// List all students.
    pub async fn list_students(&self) -> Result<Vec<Student>, AppError> {
        let rows = sqlx::query(
            "SELECT id, first_name, last_name, photo_url FROM students ORDER BY first_name, last_name"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(student_from_row).collect())
    }

    /// Get a student by ID.
    pub async fn get_student(&self, id: i64) -> Result<Option<Student>, AppError> {
        let row = sqlx::query("SELECT id, first_name, last_name, photo_url FROM students WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(student_from_row))
    }

    /// Count all students.
    pub async fn count_students(&self) -> Result<usize, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS cnt FROM students")
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = row.get("cnt");
        Ok(count as usize)
    }

    /// Create a new student.
    pub async fn create_student(
        &self,
        request: &CreateStudentRequest,
    ) -> Result<Student, AppError> {
        let result = sqlx::query(
            "INSERT INTO students (first_name, last_name, photo_url) VALUES (?, ?, ?)",
        )
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.photo_url)
        .execute(&self.pool)
        .await?;

        self.increment_revision().await?;

        Ok(Student {
            id: result.last_insert_rowid(),
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            photo_url: request.photo_url.clone(),
        })
    }

    /// Update a student. Absent fields keep their current values.
    pub async fn update_student(
        &self,
        id: i64,
        request: &UpdateStudentRequest,
    ) -> Result<Student, AppError> {
        let existing = self
            .get_student(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Student {} not found", id)))?;

        let first_name = request.first_name.as_ref().unwrap_or(&existing.first_name);
        let last_name = request.last_name.as_ref().unwrap_or(&existing.last_name);
        let photo_url = request.photo_url.clone().or(existing.photo_url.clone());

        sqlx::query("UPDATE students SET first_name = ?, last_name = ?, photo_url = ? WHERE id = ?")
            .bind(first_name)
            .bind(last_name)
            .bind(&photo_url)
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.increment_revision().await?;

        Ok(Student {
            id,
            first_name: first_name.clone(),
            last_name: last_name.clone(),
            photo_url,
        })
    }

    /// Delete a student. Memberships cascade via the foreign key.
    pub async fn delete_student(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Student {} not found", id)));
        }

        self.increment_revision().await?;
        Ok(())
    }

    // ==================== GROUP-STUDENT OPERATIONS ====================

    /// Add a single student to a group. Both referents must exist.
    pub async fn add_group_student(
        &self,
        request: &CreateGroupStudentRequest,
    ) -> Result<GroupStudent, AppError> {
        self.get_group(request.group_id).await?.ok_or_else(|| {
            AppError::NotFound(format!("Group {} not found", request.group_id))
        })?;
        self.get_student(request.student_id).await?.ok_or_else(|| {
            AppError::NotFound(format!("Student {} not found", request.student_id))
        })?;

        let result = sqlx::query(
            "INSERT INTO group_students (group_id, student_id, incident_count) VALUES (?, ?, ?)",
        )
        .bind(request.group_id)
        .bind(request.student_id)
        .bind(request.incident_count)
        .execute(&self.pool)
        .await?;

        self.increment_revision().await?;

        Ok(GroupStudent {
            id: result.last_insert_rowid(),
            group_id: request.group_id,
            student_id: request.student_id,
            incident_count: request.incident_count,
        })
    }

    /// Add several students to groups in one transaction.
    pub async fn add_group_students(
        &self,
        requests: &[CreateGroupStudentRequest],
    ) -> Result<Vec<GroupStudent>, AppError> {
        let mut results = Vec::new();

        // Use a transaction for atomicity
        let mut tx = self.pool.begin().await?;

        for request in requests {
            let group_row = sqlx::query("SELECT id FROM groups WHERE id = ?")
                .bind(request.group_id)
                .fetch_optional(&mut *tx)
                .await?;
            if group_row.is_none() {
                return Err(AppError::NotFound(format!(
                    "Group {} not found",
                    request.group_id
                )));
            }

            let student_row = sqlx::query("SELECT id FROM students WHERE id = ?")
                .bind(request.student_id)
                .fetch_optional(&mut *tx)
                .await?;
            if student_row.is_none() {
                return Err(AppError::NotFound(format!(
                    "Student {} not found",
                    request.student_id
                )));
            }

            let result = sqlx::query(
                "INSERT INTO group_students (group_id, student_id, incident_count) VALUES (?, ?, ?)"
            )
            .bind(request.group_id)
            .bind(request.student_id)
            .bind(request.incident_count)
            .execute(&mut *tx)
            .await?;

            results.push(GroupStudent {
                id: result.last_insert_rowid(),
                group_id: request.group_id,
                student_id: request.student_id,
                incident_count: request.incident_count,
            });
        }

        // Increment revision once for the entire batch
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
            .bind(&now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(results)
    }

    /// List the students that are members of a group, with computed full names.
    pub async fn list_group_members(&self, group_id: i64) -> Result<Vec<GroupMember>, AppError> {
        self.get_group(group_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Group {} not found", group_id)))?;

        let rows = sqlx::query(
            r#"SELECT s.id, s.first_name, s.last_name, s.photo_url
               FROM group_students gs
               JOIN students s ON s.id = gs.student_id
               WHERE gs.group_id = ?
               ORDER BY s.first_name, s.last_name"#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(member_from_row).collect())
    }

    /// Remove a group-student membership.
    pub async fn delete_group_student(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM group_students WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Group student {} not found",
                id
            )));
        }

        self.increment_revision().await?;
        Ok(())
    }
}

// Helper functions for enum parsing and row conversion

fn parse_roll_states(s: &str) -> Result<RollState, AppError> {
    RollState::from_str(s).ok_or_else(|| {
        AppError::Validation(format!(
            "Invalid roll_states '{}': expected one of unmark, present, absent, late",
            s
        ))
    })
}

fn parse_ltmt(s: &str) -> Result<Ltmt, AppError> {
    Ltmt::from_str(s)
        .ok_or_else(|| AppError::Validation(format!("Invalid ltmt '{}': expected '<' or '>'", s)))
}

fn group_from_row(row: &sqlx::sqlite::SqliteRow) -> Group {
    let roll_states: String = row.get("roll_states");
    let ltmt: String = row.get("ltmt");
    Group {
        id: row.get("id"),
        name: row.get("name"),
        number_of_weeks: row.get("number_of_weeks"),
        roll_states: RollState::from_str(&roll_states).unwrap_or(RollState::Unmark),
        incidents: row.get("incidents"),
        ltmt: Ltmt::from_str(&ltmt).unwrap_or(Ltmt::LessThan),
        run_at: row.get("run_at"),
        student_count: row.get("student_count"),
    }
}

fn student_from_row(row: &sqlx::sqlite::SqliteRow) -> Student {
    Student {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        photo_url: row.get("photo_url"),
    }
}

fn member_from_row(row: &sqlx::sqlite::SqliteRow) -> GroupMember {
    let first_name: String = row.get("first_name");
    let last_name: String = row.get("last_name");
    let full_name = format!("{} {}", first_name, last_name);
    GroupMember {
        id: row.get("id"),
        first_name,
        last_name,
        photo_url: row.get("photo_url"),
        full_name,
    }
}
