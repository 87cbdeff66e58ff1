/// Task endpoints
///
/// All task routes sit behind the authentication gate. Every handler follows
/// the same order: validate the payload, fetch through a non-deleted read
/// path, check the access policy, then act. Fetch-before-authorize means a
/// soft-deleted or absent task is a not-found, never a forbidden, so
/// responses leak nothing about rows the caller cannot see.

use axum::{
    extract::{Path, Query, State},
    Extension,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::{ApiError, ApiJson, ApiResult};
use crate::response::ApiResponse;
use crate::validation::{validate_task, TaskPayload};
use taskboard_shared::auth::policy::{
    can_access, can_view_deleted, owner_for_write, Principal, TaskScope,
};
use taskboard_shared::models::task::{CreateTask, Task, TaskStatus, TaskWithOwner, UpdateTask};
use taskboard_shared::models::user::{Role, User};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PAGE_SIZE: i64 = 10;

/// Pagination query parameters
#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl Pagination {
    /// Resolves page and size with defaults, clamped to at least 1
    fn resolve(&self) -> (i64, i64) {
        let page = self.page.unwrap_or(DEFAULT_PAGE).max(1);
        let size = self.size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
        (page, size)
    }

    // Saturating math: page and size come straight off the query string,
    // so huge values must degrade to an empty page, not overflow.
    fn offset(page: i64, size: i64) -> i64 {
        page.saturating_sub(1).saturating_mul(size)
    }
}

/// Task owner as it appears inside a task response
#[derive(Debug, Serialize)]
pub struct OwnerResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Task as it appears on the wire
///
/// Due dates render date-only regardless of the precision they were stored
/// with. The soft-delete flag never appears.
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub user: OwnerResponse,
}

impl TaskResponse {
    fn from_parts(task: &Task, owner: &User) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            due_date: task.due_date.format("%Y-%m-%d").to_string(),
            created_at: task.created_at,
            updated_at: task.updated_at,
            user: OwnerResponse {
                id: owner.id,
                username: owner.username.clone(),
                email: owner.email.clone(),
                role: owner.role,
                created_at: owner.created_at,
                updated_at: owner.updated_at,
            },
        }
    }

    fn from_row(row: &TaskWithOwner) -> Self {
        Self {
            id: row.id,
            title: row.title.clone(),
            description: row.description.clone(),
            status: row.status,
            due_date: row.due_date.format("%Y-%m-%d").to_string(),
            created_at: row.created_at,
            updated_at: row.updated_at,
            user: OwnerResponse {
                id: row.user_id,
                username: row.owner_username.clone(),
                email: row.owner_email.clone(),
                role: row.owner_role,
                created_at: row.owner_created_at,
                updated_at: row.owner_updated_at,
            },
        }
    }
}

/// Parses a path segment as a task ID
///
/// A malformed ID cannot name any task, so it maps to not-found rather than
/// a validation error.
fn parse_task_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::TaskNotFound)
}

/// Fetches the owner for a single-task response
async fn fetch_owner(state: &AppState, user_id: Uuid) -> Result<User, ApiError> {
    User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::InternalError(format!("Task owner {} missing", user_id)))
}

/// GET /api/v1/tasks
///
/// Lists non-deleted tasks in the caller's scope, newest first: admins see
/// every user's tasks, everyone else only their own. The total covers the
/// scope, not just the returned page.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(pagination): Query<Pagination>,
) -> ApiResult<ApiResponse<Vec<TaskResponse>>> {
    let (page, size) = pagination.resolve();
    let scope = TaskScope::for_principal(&principal);

    let rows = Task::list(&state.db, &scope, size, Pagination::offset(page, size)).await?;
    let total = Task::count(&state.db, &scope).await?;

    let tasks: Vec<TaskResponse> = rows.iter().map(TaskResponse::from_row).collect();

    Ok(ApiResponse::new("Tasks retrieved successfully")
        .data(tasks)
        .paginated(page, size, total))
}

/// GET /api/v1/tasks/deleted
///
/// Lists soft-deleted tasks across all users. Admin only; there is no
/// per-user deleted listing.
pub async fn list_deleted_tasks(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(pagination): Query<Pagination>,
) -> ApiResult<ApiResponse<Vec<TaskResponse>>> {
    if !can_view_deleted(&principal) {
        return Err(ApiError::TaskForbidden(
            "You are not authorized to view this page",
        ));
    }

    let (page, size) = pagination.resolve();
    let scope = TaskScope::Deleted;

    let rows = Task::list(&state.db, &scope, size, Pagination::offset(page, size)).await?;
    let total = Task::count(&state.db, &scope).await?;

    let tasks: Vec<TaskResponse> = rows.iter().map(TaskResponse::from_row).collect();

    Ok(ApiResponse::new("Deleted tasks retrieved successfully")
        .data(tasks)
        .paginated(page, size, total))
}

/// GET /api/v1/tasks/:id
pub async fn show_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<TaskResponse>> {
    let id = parse_task_id(&id)?;

    let task = Task::find_active(&state.db, id)
        .await?
        .ok_or(ApiError::TaskNotFound)?;

    if !can_access(&principal, &task) {
        return Err(ApiError::TaskForbidden(
            "You are not authorized to view this task",
        ));
    }

    let owner = fetch_owner(&state, task.user_id).await?;

    Ok(ApiResponse::new("Task retrieved successfully").data(TaskResponse::from_parts(&task, &owner)))
}

/// POST /api/v1/tasks
///
/// Creates a task. Admins may assign any existing user as the owner via
/// `user_id`; for everyone else the field is validated but ignored and the
/// task is their own.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiJson(payload): ApiJson<TaskPayload>,
) -> ApiResult<ApiResponse<TaskResponse>> {
    let data = validate_task(&state.db, &payload).await?;

    let owner_id = owner_for_write(&principal, data.user_id);

    let task = Task::create(
        &state.db,
        CreateTask {
            title: data.title,
            description: data.description,
            status: data.status,
            due_date: data.due_date,
            user_id: owner_id,
        },
    )
    .await?;

    tracing::info!(task_id = %task.id, user_id = %owner_id, "Task created");

    let owner = fetch_owner(&state, task.user_id).await?;

    Ok(ApiResponse::new("Task created successfully").data(TaskResponse::from_parts(&task, &owner)))
}

/// PUT /api/v1/tasks/:id
///
/// Validation runs before the row is fetched, so a bad payload against an
/// unknown ID reports the payload failure. Status is preserved when absent;
/// an absent due date resets to now, like on create. An absent `user_id`
/// leaves the owner unchanged, so an admin editing someone's task does not
/// claim it.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<TaskPayload>,
) -> ApiResult<ApiResponse<TaskResponse>> {
    let data = validate_task(&state.db, &payload).await?;

    let id = parse_task_id(&id)?;

    let task = Task::find_active(&state.db, id)
        .await?
        .ok_or(ApiError::TaskNotFound)?;

    if !can_access(&principal, &task) {
        return Err(ApiError::TaskForbidden(
            "You are not authorized to update this task",
        ));
    }

    // Fall back to the current owner, not the principal
    let owner_id = owner_for_write(&principal, data.user_id.or(Some(task.user_id)));

    let updated = Task::update(
        &state.db,
        id,
        UpdateTask {
            title: data.title,
            description: data.description,
            due_date: data.due_date.unwrap_or_else(chrono::Utc::now),
            status: data.status,
            user_id: owner_id,
        },
    )
    .await?
    .ok_or(ApiError::TaskNotFound)?;

    tracing::info!(task_id = %updated.id, "Task updated");

    let owner = fetch_owner(&state, updated.user_id).await?;

    Ok(ApiResponse::new("Task updated successfully")
        .data(TaskResponse::from_parts(&updated, &owner)))
}

/// DELETE /api/v1/tasks/:id
///
/// Soft-deletes the task. The row stays in the database and surfaces only in
/// the admin deleted listing; deleting it again yields not-found.
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    let id = parse_task_id(&id)?;

    let task = Task::find_active(&state.db, id)
        .await?
        .ok_or(ApiError::TaskNotFound)?;

    if !can_access(&principal, &task) {
        return Err(ApiError::TaskForbidden(
            "You are not authorized to delete this task",
        ));
    }

    if !Task::soft_delete(&state.db, id).await? {
        return Err(ApiError::TaskNotFound);
    }

    tracing::info!(task_id = %id, "Task deleted");

    Ok(ApiResponse::new("Task deleted successfully"))
}
