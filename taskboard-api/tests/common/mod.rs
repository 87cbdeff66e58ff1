/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup and cleanup
/// - Test user and admin creation
/// - JWT token generation
/// - Request and response helpers
///
/// Every context gets its own pair of accounts with unique emails, so tests
/// can run concurrently against one database.

use axum::body::Body;
use axum::http::Request;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::Config;
use taskboard_shared::auth::jwt::{create_token, Claims};
use taskboard_shared::auth::password::hash_password;
use taskboard_shared::models::task::{CreateTask, Task, TaskStatus};
use taskboard_shared::models::user::{CreateUser, Role, User};
use sqlx::PgPool;
use uuid::Uuid;

/// Password shared by all test accounts
pub const TEST_PASSWORD: &str = "correct horse battery staple";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub user: User,
    pub admin: User,
    pub user_token: String,
    pub admin_token: String,
}

impl TestContext {
    /// Creates a new test context with a migrated database and two accounts
    pub async fn new() -> anyhow::Result<Self> {
        // Load test configuration
        let config = Config::from_env()?;

        // Connect to database
        let db = PgPool::connect(&config.database.url).await?;

        // Run migrations (path relative to Cargo.toml, not this file)
        sqlx::migrate!("../migrations").run(&db).await?;

        let password_hash = hash_password(TEST_PASSWORD)?;

        // Create regular test user
        let user = User::create(
            &db,
            CreateUser {
                username: "Test User".to_string(),
                email: format!("user-{}@example.com", Uuid::new_v4()),
                password_hash: password_hash.clone(),
                role: Role::User,
            },
        )
        .await?;

        // Create admin test user
        let admin = User::create(
            &db,
            CreateUser {
                username: "Test Admin".to_string(),
                email: format!("admin-{}@example.com", Uuid::new_v4()),
                password_hash,
                role: Role::Admin,
            },
        )
        .await?;

        // Generate JWT tokens
        let user_token = create_token(&Claims::new(user.id, user.role), &config.jwt.secret)?;
        let admin_token = create_token(&Claims::new(admin.id, admin.role), &config.jwt.secret)?;

        // Build app
        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            user,
            admin,
            user_token,
            admin_token,
        })
    }

    /// Returns authorization header value for the regular user
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.user_token)
    }

    /// Returns authorization header value for the admin
    pub fn admin_auth_header(&self) -> String {
        format!("Bearer {}", self.admin_token)
    }

    /// Creates a task directly in the database, owned by the given user
    pub async fn create_task(&self, owner_id: Uuid, title: &str) -> anyhow::Result<Task> {
        let task = Task::create(
            &self.db,
            CreateTask {
                title: title.to_string(),
                description: format!("Description for {}", title),
                status: Some(TaskStatus::New),
                due_date: None,
                user_id: owner_id,
            },
        )
        .await?;

        Ok(task)
    }

    /// Cleans up test data
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        for user_id in [self.user.id, self.admin.id] {
            sqlx::query("DELETE FROM tasks WHERE user_id = $1")
                .bind(user_id)
                .execute(&self.db)
                .await?;
            sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(user_id)
                .execute(&self.db)
                .await?;
        }
        Ok(())
    }
}

/// Builds a JSON request with an optional bearer token
pub fn json_request(
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }

    let body = match body {
        Some(json) => Body::from(json.to_string()),
        None => Body::empty(),
    };

    builder.body(body).unwrap()
}

/// Reads a response body as JSON
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
