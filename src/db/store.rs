//! Bug store: validated CRUD over the `bugs` table.
//!
//! Every operation touches a single row. Title uniqueness is enforced by the
//! table constraint, so the check cannot race with a concurrent create.

use chrono::{SubsecRound, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::errors::{AppError, DATABASE_ERROR_MESSAGE};
use crate::models::{Bug, BugPriority, BugStatus, CreateBugRequest, UpdateBugRequest};

const DUPLICATE_TITLE: &str = "A bug with this title already exists";

/// Persistence handle owning canonical bug state.
#[derive(Clone)]
pub struct BugStore {
    pool: SqlitePool,
}

impl BugStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all bugs in insertion order.
    pub async fn list(&self) -> Result<Vec<Bug>, AppError> {
        let rows = sqlx::query(
            "SELECT id, title, description, status, priority, created_at FROM bugs ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(bug_from_row).collect()
    }

    /// Number of stored bugs.
    pub async fn count(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM bugs")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("total")?)
    }

    /// Get a bug by ID.
    pub async fn get(&self, id: &str) -> Result<Option<Bug>, AppError> {
        let row = sqlx::query(
            "SELECT id, title, description, status, priority, created_at FROM bugs WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(bug_from_row).transpose()
    }

    /// Validate and persist a new bug, assigning its id and creation time.
    pub async fn create(&self, request: &CreateBugRequest) -> Result<Bug, AppError> {
        let new_bug = request.validate()?;

        let bug = Bug {
            id: uuid::Uuid::new_v4().to_string(),
            title: new_bug.title,
            description: new_bug.description,
            status: new_bug.status,
            priority: new_bug.priority,
            created_at: Utc::now().trunc_subsecs(3),
        };

        sqlx::query(
            "INSERT INTO bugs (id, title, description, status, priority, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&bug.id)
        .bind(&bug.title)
        .bind(&bug.description)
        .bind(bug.status.as_str())
        .bind(bug.priority.as_str())
        .bind(bug.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        tracing::debug!(bug_id = %bug.id, "Created bug");
        Ok(bug)
    }

    /// Merge the supplied fields into an existing bug.
    pub async fn update(&self, id: &str, request: &UpdateBugRequest) -> Result<Bug, AppError> {
        let existing = self.get(id).await?.ok_or_else(AppError::bug_not_found)?;
        let merged = request.apply_to(&existing)?;

        let result = sqlx::query(
            "UPDATE bugs SET title = ?, description = ?, status = ?, priority = ? WHERE id = ?",
        )
        .bind(&merged.title)
        .bind(&merged.description)
        .bind(merged.status.as_str())
        .bind(merged.priority.as_str())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        // Deleted between the read and the write.
        if result.rows_affected() == 0 {
            return Err(AppError::bug_not_found());
        }

        tracing::debug!(bug_id = %id, status = merged.status.as_str(), "Updated bug");
        Ok(merged)
    }

    /// Permanently delete a bug.
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM bugs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::bug_not_found());
        }

        tracing::debug!(bug_id = %id, "Deleted bug");
        Ok(())
    }
}

fn map_write_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AppError::Conflict(DUPLICATE_TITLE.to_string());
        }
    }
    err.into()
}

fn bug_from_row(row: &SqliteRow) -> Result<Bug, AppError> {
    let status: String = row.try_get("status")?;
    let priority: String = row.try_get("priority")?;

    Ok(Bug {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        status: BugStatus::parse(&status).ok_or_else(|| invalid_column("status", &status))?,
        priority: BugPriority::parse(&priority)
            .ok_or_else(|| invalid_column("priority", &priority))?,
        created_at: row.try_get("created_at")?,
    })
}

fn invalid_column(column: &str, value: &str) -> AppError {
    tracing::error!("Stored {} `{}` is invalid", column, value);
    AppError::Database(DATABASE_ERROR_MESSAGE.to_string())
}
