/// Health check endpoint
///
/// Reports process liveness and database connectivity. Unauthenticated, so
/// load balancers and uptime monitors can reach it without a token.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::app::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: "healthy" or "degraded"
    pub status: String,

    /// Crate version
    pub version: String,

    /// Database connectivity: "connected" or "disconnected"
    pub database: String,
}

/// GET /health
///
/// Returns 200 when the database responds, 503 when it does not.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database_ok = sqlx::query("SELECT 1").execute(&state.db).await.is_ok();

    let (status_code, status, database) = if database_ok {
        (StatusCode::OK, "healthy", "connected")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "disconnected")
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            version: taskboard_shared::VERSION.to_string(),
            database: database.to_string(),
        }),
    )
}
