/// API route handlers
///
/// Routes are grouped by concern:
/// - `health`: Liveness and database connectivity check
/// - `auth`: Registration, login, and the current-user endpoint
/// - `tasks`: Task CRUD, listings, and the deleted-task listing

pub mod auth;
pub mod health;
pub mod tasks;
