/// Task model and database operations
///
/// Tasks belong to a user and are never physically deleted. The `is_deleted`
/// flag marks a task invisible to every default read path; only the dedicated
/// deleted listing surfaces flagged rows.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL,
///     status task_status NOT NULL DEFAULT 'new',
///     due_date TIMESTAMPTZ NOT NULL,
///     user_id UUID NOT NULL REFERENCES users(id),
///     is_deleted BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::policy::TaskScope;
use super::user::Role;

/// Task workflow status
///
/// A fixed enumeration with no transition rules; any status may be written
/// at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Newly created, not yet picked up
    New,

    /// In progress
    Pending,

    /// Completed
    Done,
}

impl TaskStatus {
    /// Gets status as string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::New => "new",
            TaskStatus::Pending => "pending",
            TaskStatus::Done => "done",
        }
    }

    /// Parses a status from its wire representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(TaskStatus::New),
            "pending" => Some(TaskStatus::Pending),
            "done" => Some(TaskStatus::Done),
            _ => None,
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::New
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub id: Uuid,

    /// Task title
    pub title: String,

    /// Task description
    pub description: String,

    /// Workflow status
    pub status: TaskStatus,

    /// When the task is due
    pub due_date: DateTime<Utc>,

    /// Owning user ID
    pub user_id: Uuid,

    /// Soft-delete flag; flagged rows are invisible to default reads
    pub is_deleted: bool,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Task row joined with its owner's account fields
///
/// Used by the list endpoints so owner data comes back in a single query
/// instead of one lookup per row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TaskWithOwner {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: DateTime<Utc>,
    pub user_id: Uuid,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Owner's display name
    pub owner_username: String,

    /// Owner's email address
    pub owner_email: String,

    /// Owner's role
    pub owner_role: Role,

    /// When the owner account was created
    pub owner_created_at: DateTime<Utc>,

    /// When the owner account was last updated
    pub owner_updated_at: DateTime<Utc>,
}

/// Input for creating a new task
///
/// Status defaults to `new` and due date to the current time when omitted.
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub description: String,
    pub status: Option<TaskStatus>,
    pub due_date: Option<DateTime<Utc>>,

    /// Owner, already resolved by the access policy
    pub user_id: Uuid,
}

/// Input for updating an existing task
///
/// Title, description, due date, and owner are always overwritten; status is
/// only overwritten when present.
#[derive(Debug, Clone)]
pub struct UpdateTask {
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub status: Option<TaskStatus>,

    /// Owner, already resolved by the access policy
    pub user_id: Uuid,
}

const TASK_COLUMNS: &str =
    "id, title, description, status, due_date, user_id, is_deleted, created_at, updated_at";

const TASK_WITH_OWNER_COLUMNS: &str = "t.id, t.title, t.description, t.status, t.due_date, \
     t.user_id, t.is_deleted, t.created_at, t.updated_at, \
     u.username AS owner_username, u.email AS owner_email, u.role AS owner_role, \
     u.created_at AS owner_created_at, u.updated_at AS owner_updated_at";

impl Task {
    /// Creates a new task
    ///
    /// Applies the documented defaults: status `new` and due date "now" when
    /// the caller omitted them.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (title, description, status, due_date, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(data.title)
        .bind(data.description)
        .bind(data.status.unwrap_or_default())
        .bind(data.due_date.unwrap_or_else(Utc::now))
        .bind(data.user_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a non-deleted task by ID
    ///
    /// A soft-deleted row is indistinguishable from an absent ID here, which
    /// is what keeps deleted tasks invisible to show/update/delete.
    pub async fn find_active(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND is_deleted = FALSE"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Updates a non-deleted task
    ///
    /// Title, description, due date, and owner are overwritten; status only
    /// when `data.status` is present.
    ///
    /// # Returns
    ///
    /// The updated task, or None when the ID does not name a visible task.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from(
            "UPDATE tasks SET updated_at = NOW(), title = $2, description = $3, \
             due_date = $4, user_id = $5",
        );
        if data.status.is_some() {
            query.push_str(", status = $6");
        }
        query.push_str(" WHERE id = $1 AND is_deleted = FALSE RETURNING ");
        query.push_str(TASK_COLUMNS);

        let mut q = sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(data.title)
            .bind(data.description)
            .bind(data.due_date)
            .bind(data.user_id);

        if let Some(status) = data.status {
            q = q.bind(status);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Soft-deletes a non-deleted task
    ///
    /// # Returns
    ///
    /// True if a visible task was flagged, false when the ID does not name
    /// one (already deleted rows included).
    pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tasks SET is_deleted = TRUE, updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists tasks in a scope with their owners, newest first
    pub async fn list(
        pool: &PgPool,
        scope: &TaskScope,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TaskWithOwner>, sqlx::Error> {
        let tasks = match scope {
            TaskScope::All => {
                sqlx::query_as::<_, TaskWithOwner>(&format!(
                    "SELECT {TASK_WITH_OWNER_COLUMNS} FROM tasks t \
                     JOIN users u ON u.id = t.user_id \
                     WHERE t.is_deleted = FALSE \
                     ORDER BY t.created_at DESC LIMIT $1 OFFSET $2"
                ))
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
            }
            TaskScope::Owned(owner_id) => {
                sqlx::query_as::<_, TaskWithOwner>(&format!(
                    "SELECT {TASK_WITH_OWNER_COLUMNS} FROM tasks t \
                     JOIN users u ON u.id = t.user_id \
                     WHERE t.is_deleted = FALSE AND t.user_id = $1 \
                     ORDER BY t.created_at DESC LIMIT $2 OFFSET $3"
                ))
                .bind(owner_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
            }
            TaskScope::Deleted => {
                sqlx::query_as::<_, TaskWithOwner>(&format!(
                    "SELECT {TASK_WITH_OWNER_COLUMNS} FROM tasks t \
                     JOIN users u ON u.id = t.user_id \
                     WHERE t.is_deleted = TRUE \
                     ORDER BY t.created_at DESC LIMIT $1 OFFSET $2"
                ))
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
            }
        };

        Ok(tasks)
    }

    /// Counts tasks in a scope
    ///
    /// Pagination totals come from here so they cover the filtered scope,
    /// not the whole table.
    pub async fn count(pool: &PgPool, scope: &TaskScope) -> Result<i64, sqlx::Error> {
        let count: i64 = match scope {
            TaskScope::All => {
                sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE is_deleted = FALSE")
                    .fetch_one(pool)
                    .await?
            }
            TaskScope::Owned(owner_id) => {
                sqlx::query_scalar(
                    "SELECT COUNT(*) FROM tasks WHERE is_deleted = FALSE AND user_id = $1",
                )
                .bind(owner_id)
                .fetch_one(pool)
                .await?
            }
            TaskScope::Deleted => {
                sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE is_deleted = TRUE")
                    .fetch_one(pool)
                    .await?
            }
        };

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(TaskStatus::New.as_str(), "new");
        assert_eq!(TaskStatus::Pending.as_str(), "pending");
        assert_eq!(TaskStatus::Done.as_str(), "done");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(TaskStatus::parse("new"), Some(TaskStatus::New));
        assert_eq!(TaskStatus::parse("pending"), Some(TaskStatus::Pending));
        assert_eq!(TaskStatus::parse("done"), Some(TaskStatus::Done));
        assert_eq!(TaskStatus::parse("archived"), None);
        assert_eq!(TaskStatus::parse("Done"), None);
    }

    #[test]
    fn test_status_default_is_new() {
        assert_eq!(TaskStatus::default(), TaskStatus::New);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TaskStatus::New).unwrap(), "\"new\"");
        assert_eq!(
            serde_json::to_string(&TaskStatus::Pending).unwrap(),
            "\"pending\""
        );
    }

    // Integration tests for database operations are in the api crate's tests/
}
