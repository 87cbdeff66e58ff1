/// Authentication and authorization utilities
///
/// This module provides the secure primitives behind the Taskboard API:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT token generation and validation
/// - [`middleware`]: Bearer-token authentication gate for axum
/// - [`policy`]: Task access policy (ownership, roles, soft-delete scopes)
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **JWT Tokens**: HS256 signing with expiration and issuer checks
/// - **Constant-time Comparison**: Verification uses constant-time operations

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod policy;
