/// Authentication middleware for axum
///
/// Validates Bearer tokens from the Authorization header and adds a
/// [`Principal`] to request extensions. Every failure mode renders the same
/// unauthenticated envelope so callers cannot distinguish a missing header
/// from an expired token.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use taskboard_shared::auth::middleware::create_jwt_middleware;
/// use taskboard_shared::auth::policy::Principal;
///
/// async fn protected(Extension(principal): Extension<Principal>) -> String {
///     format!("Hello, user {}!", principal.user_id)
/// }
///
/// let app: Router = Router::new()
///     .route("/protected", get(protected))
///     .layer(middleware::from_fn(create_jwt_middleware(
///         "your-jwt-secret".to_string(),
///     )));
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::jwt::{validate_token, JwtError};
use super::policy::Principal;

/// Error type for the authentication gate
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Authorization header is not a Bearer token
    InvalidFormat,

    /// Token validation failed
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // One envelope for every failure mode
        let body = json!({
            "status": false,
            "message": "Unauthenticated",
            "code": "general:unauthenticated",
        });

        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

/// JWT authentication middleware
///
/// Validates tokens from the `Authorization: Bearer <token>` header and
/// inserts a [`Principal`] into request extensions on success.
///
/// # Errors
///
/// Returns the unauthenticated envelope (HTTP 401) if the header is missing,
/// the scheme is not Bearer, or token validation fails.
pub async fn jwt_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidFormat)?;

    let claims = validate_token(token, &secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer { .. } => AuthError::InvalidToken("Invalid issuer".to_string()),
        _ => AuthError::InvalidToken(format!("Invalid token: {}", e)),
    })?;

    let principal = Principal {
        user_id: claims.sub,
        role: claims.role,
    };
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Creates a JWT authentication middleware closure
///
/// Helper that captures the JWT secret and returns a middleware function
/// suitable for `axum::middleware::from_fn`. Takes the secret by value so
/// the closure owns its state and satisfies the `'static` bound the layer
/// requires.
pub fn create_jwt_middleware(
    secret: String,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<
    Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>,
> + Clone {
    move |req, next| {
        let secret = secret.clone();
        Box::pin(jwt_auth_middleware(secret, req, next))
    }
}
