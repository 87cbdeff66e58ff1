/// Request validation rule sets
///
/// Each operation has a rule set that either yields typed, validated data or
/// a field-keyed map of human-readable messages. The messages are part of
/// the API contract, so they live here verbatim rather than being derived.
///
/// Payload fields are deserialized loosely (as raw JSON values) so a field
/// of the wrong type produces its documented validation message instead of a
/// body-level deserialization failure.
///
/// Auth payload failures map to `general:validation` (400); task payload
/// failures map to `validation:failed` (422). Database-backed checks (email
/// uniqueness, owner existence) run together with the field rules so one
/// response carries every failure.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::error::{ApiError, FieldErrors};
use taskboard_shared::models::task::TaskStatus;
use taskboard_shared::models::user::{Role, User};

/// Login payload, loosely typed
#[derive(Debug, Default, Deserialize)]
pub struct LoginPayload {
    #[serde(default)]
    pub email: Option<Value>,
    #[serde(default)]
    pub password: Option<Value>,
}

/// Validated login data
#[derive(Debug)]
pub struct LoginData {
    pub email: String,
    pub password: String,
}

/// Registration payload, loosely typed
#[derive(Debug, Default, Deserialize)]
pub struct RegisterPayload {
    #[serde(default)]
    pub username: Option<Value>,
    #[serde(default)]
    pub email: Option<Value>,
    #[serde(default)]
    pub password: Option<Value>,
    #[serde(default)]
    pub role: Option<Value>,
}

/// Validated registration data
#[derive(Debug)]
pub struct RegisterData {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Task create/update payload, loosely typed
#[derive(Debug, Default, Deserialize)]
pub struct TaskPayload {
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub due_date: Option<Value>,
    #[serde(default)]
    pub user_id: Option<Value>,
}

/// Validated task data
///
/// Optional fields stay optional here; defaulting happens at the store or
/// in the handler, not in validation.
#[derive(Debug)]
pub struct TaskData {
    pub title: String,
    pub description: String,
    pub status: Option<TaskStatus>,
    pub due_date: Option<DateTime<Utc>>,
    pub user_id: Option<Uuid>,
}

/// How a loosely-typed field arrived in the payload
enum Field<'a> {
    /// Absent or JSON null
    Missing,

    /// Present but not a JSON string
    NotAString,

    /// Present as a string
    Str(&'a str),
}

fn string_field(value: &Option<Value>) -> Field<'_> {
    match value {
        None | Some(Value::Null) => Field::Missing,
        Some(Value::String(s)) => Field::Str(s),
        Some(_) => Field::NotAString,
    }
}

fn push_error(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

/// Validates a login payload
///
/// # Errors
///
/// Returns `ApiError::Validation` (400, `general:validation`) carrying the
/// per-field messages.
pub fn validate_login(payload: &LoginPayload) -> Result<LoginData, ApiError> {
    let mut errors = FieldErrors::new();

    let email = match string_field(&payload.email) {
        Field::Str(s) if !s.is_empty() => {
            if !s.validate_email() {
                push_error(&mut errors, "email", "Email is not valid");
            }
            s.to_string()
        }
        Field::NotAString => {
            push_error(&mut errors, "email", "Email is not valid");
            String::new()
        }
        _ => {
            push_error(&mut errors, "email", "Email is required");
            String::new()
        }
    };

    let password = match string_field(&payload.password) {
        Field::Str(s) if !s.is_empty() => s.to_string(),
        _ => {
            push_error(&mut errors, "password", "Password is required");
            String::new()
        }
    };

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    Ok(LoginData { email, password })
}

/// Field checks for registration; uniqueness is layered on by
/// [`validate_register`].
fn check_register_fields(payload: &RegisterPayload) -> (RegisterData, FieldErrors) {
    let mut errors = FieldErrors::new();

    let username = match string_field(&payload.username) {
        Field::Str(s) if !s.is_empty() => s.to_string(),
        _ => {
            push_error(&mut errors, "username", "Username is required");
            String::new()
        }
    };

    let email = match string_field(&payload.email) {
        Field::Str(s) if !s.is_empty() => {
            if !s.validate_email() {
                push_error(&mut errors, "email", "Email is not valid");
            }
            s.to_string()
        }
        Field::NotAString => {
            push_error(&mut errors, "email", "Email is not valid");
            String::new()
        }
        _ => {
            push_error(&mut errors, "email", "Email is required");
            String::new()
        }
    };

    let password = match string_field(&payload.password) {
        Field::Str(s) if !s.is_empty() => s.to_string(),
        _ => {
            push_error(&mut errors, "password", "Password is required");
            String::new()
        }
    };

    let role = match string_field(&payload.role) {
        Field::Missing => Role::default(),
        Field::Str(s) => match Role::parse(s) {
            Some(role) => role,
            None => {
                push_error(&mut errors, "role", "Role is not valid");
                Role::default()
            }
        },
        Field::NotAString => {
            push_error(&mut errors, "role", "Role is not valid");
            Role::default()
        }
    };

    (
        RegisterData {
            username,
            email,
            password,
            role,
        },
        errors,
    )
}

/// Validates a registration payload, including email uniqueness
///
/// # Errors
///
/// Returns `ApiError::Validation` (400, `general:validation`) with every
/// failing rule, or an internal error if the uniqueness lookup fails.
pub async fn validate_register(
    pool: &PgPool,
    payload: &RegisterPayload,
) -> Result<RegisterData, ApiError> {
    let (data, mut errors) = check_register_fields(payload);

    // Only check uniqueness for well-formed addresses
    if !errors.contains_key("email") && User::email_exists(pool, &data.email).await? {
        push_error(&mut errors, "email", "Email is already taken");
    }

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    Ok(data)
}

fn parse_due_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Field checks for task payloads; owner existence is layered on by
/// [`validate_task`].
fn check_task_fields(payload: &TaskPayload) -> (TaskData, FieldErrors) {
    let mut errors = FieldErrors::new();

    let title = match string_field(&payload.title) {
        Field::Str(s) if !s.is_empty() => s.to_string(),
        Field::NotAString => {
            push_error(&mut errors, "title", "The title field must be a string");
            String::new()
        }
        _ => {
            push_error(&mut errors, "title", "The title field is required");
            String::new()
        }
    };

    let description = match string_field(&payload.description) {
        Field::Str(s) if !s.is_empty() => s.to_string(),
        Field::NotAString => {
            push_error(
                &mut errors,
                "description",
                "The description field must be a string",
            );
            String::new()
        }
        _ => {
            push_error(
                &mut errors,
                "description",
                "The description field is required",
            );
            String::new()
        }
    };

    let status = match string_field(&payload.status) {
        Field::Missing => None,
        Field::Str(s) => match TaskStatus::parse(s) {
            Some(status) => Some(status),
            None => {
                push_error(
                    &mut errors,
                    "status",
                    "The status field must be one of: new, pending, done",
                );
                None
            }
        },
        Field::NotAString => {
            push_error(
                &mut errors,
                "status",
                "The status field must be one of: new, pending, done",
            );
            None
        }
    };

    let due_date = match string_field(&payload.due_date) {
        Field::Missing => None,
        Field::Str(s) => match parse_due_date(s) {
            Some(dt) => Some(dt),
            None => {
                push_error(&mut errors, "due_date", "The due_date field must be a date");
                None
            }
        },
        Field::NotAString => {
            push_error(&mut errors, "due_date", "The due_date field must be a date");
            None
        }
    };

    let user_id = match string_field(&payload.user_id) {
        Field::Missing => None,
        Field::Str(s) => match Uuid::parse_str(s) {
            Ok(id) => Some(id),
            Err(_) => {
                push_error(&mut errors, "user_id", "The user_id does not exist");
                None
            }
        },
        Field::NotAString => {
            push_error(&mut errors, "user_id", "The user_id does not exist");
            None
        }
    };

    (
        TaskData {
            title,
            description,
            status,
            due_date,
            user_id,
        },
        errors,
    )
}

/// Validates a task create/update payload, including owner existence
///
/// # Errors
///
/// Returns `ApiError::TaskValidation` (422, `validation:failed`) with every
/// failing rule, or an internal error if the existence lookup fails.
pub async fn validate_task(pool: &PgPool, payload: &TaskPayload) -> Result<TaskData, ApiError> {
    let (data, mut errors) = check_task_fields(payload);

    if let Some(user_id) = data.user_id {
        if !User::exists(pool, user_id).await? {
            push_error(&mut errors, "user_id", "The user_id does not exist");
        }
    }

    if !errors.is_empty() {
        return Err(ApiError::TaskValidation(errors));
    }

    Ok(data)
}
