/// Authentication endpoints
///
/// - `POST /api/v1/auth/register`: Creates an account
/// - `POST /api/v1/auth/login`: Verifies credentials, returns an access token
/// - `GET /api/v1/auth/user`: Returns the authenticated account (protected)

use axum::{extract::State, Extension};
use serde::Serialize;

use crate::app::AppState;
use crate::error::{ApiError, ApiJson, ApiResult};
use crate::response::ApiResponse;
use crate::validation::{validate_login, validate_register, LoginPayload, RegisterPayload};
use taskboard_shared::auth::jwt::{create_token, Claims};
use taskboard_shared::auth::password::{hash_password, verify_password};
use taskboard_shared::auth::policy::Principal;
use taskboard_shared::models::user::{CreateUser, User};

/// Login response data
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

/// POST /api/v1/auth/register
///
/// Validates the payload (including email uniqueness), hashes the password,
/// and stores the account. Role defaults to `user` when omitted.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterPayload>,
) -> ApiResult<ApiResponse<User>> {
    let data = validate_register(&state.db, &payload).await?;

    let password_hash = hash_password(&data.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: data.username,
            email: data.email,
            password_hash,
            role: data.role,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(ApiResponse::new("Register success").data(user))
}

/// POST /api/v1/auth/login
///
/// Verifies credentials against the stored hash and issues an access token.
/// An unknown email and a wrong password produce the same response.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginPayload>,
) -> ApiResult<ApiResponse<LoginResponse>> {
    let data = validate_login(&payload)?;

    let user = User::find_by_email(&state.db, &data.email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&data.password, &user.password_hash)? {
        return Err(ApiError::InvalidCredentials);
    }

    let claims = Claims::new(user.id, user.role);
    let access_token = create_token(&claims, &state.config.jwt.secret)?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(ApiResponse::new("Login success").data(LoginResponse { access_token }))
}

/// GET /api/v1/auth/user
///
/// Returns the account behind the presented token. A token whose subject no
/// longer exists is treated the same as no token at all.
pub async fn current_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<ApiResponse<User>> {
    let user = User::find_by_id(&state.db, principal.user_id)
        .await?
        .ok_or(ApiError::Unauthenticated)?;

    Ok(ApiResponse::new("User data").data(user))
}
