/// Task access policy
///
/// Every task operation composes the same three decisions, kept here as pure
/// functions so they can be tested without a database:
///
/// - **Scope**: which rows a principal may list ([`TaskScope::for_principal`])
/// - **Access**: whether a principal may act on a fetched task ([`can_access`])
/// - **Owner assignment**: whose task a write produces ([`owner_for_write`])
///
/// Visibility is decided before authorization: handlers fetch with
/// `is_deleted = FALSE` first, so a soft-deleted task yields a not-found
/// response and never a forbidden one, leaking nothing about its existence.
///
/// Roles are compared by strict equality. There is no hierarchy to extend;
/// a new role grants nothing until this module says otherwise.
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::policy::{Principal, TaskScope};
/// use taskboard_shared::models::user::Role;
/// use uuid::Uuid;
///
/// let admin = Principal { user_id: Uuid::new_v4(), role: Role::Admin };
/// assert!(matches!(TaskScope::for_principal(&admin), TaskScope::All));
///
/// let user = Principal { user_id: Uuid::new_v4(), role: Role::User };
/// assert!(matches!(TaskScope::for_principal(&user), TaskScope::Owned(_)));
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::task::Task;
use crate::models::user::Role;

/// Authenticated identity, extracted from a validated token
///
/// Added to request extensions by the authentication gate and passed
/// explicitly into every policy decision.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Principal {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Account role from the token claims
    pub role: Role,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Row scope for task listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskScope {
    /// All non-deleted tasks (admin listing)
    All,

    /// Non-deleted tasks owned by the given user
    Owned(Uuid),

    /// All soft-deleted tasks, globally (admin-only listing)
    Deleted,
}

impl TaskScope {
    /// Resolves the default listing scope for a principal
    pub fn for_principal(principal: &Principal) -> Self {
        if principal.is_admin() {
            TaskScope::All
        } else {
            TaskScope::Owned(principal.user_id)
        }
    }
}

/// Checks whether a principal may view, update, or delete a task
///
/// True when the principal owns the task or is an admin. Callers must have
/// already fetched the task through a non-deleted read path.
pub fn can_access(principal: &Principal, task: &Task) -> bool {
    task.user_id == principal.user_id || principal.is_admin()
}

/// Resolves the owner a create or update writes
///
/// Admins may assign any existing user; for everyone else a supplied owner
/// is silently ignored and the task stays the principal's own.
pub fn owner_for_write(principal: &Principal, requested: Option<Uuid>) -> Uuid {
    if principal.is_admin() {
        requested.unwrap_or(principal.user_id)
    } else {
        principal.user_id
    }
}

/// Checks whether a principal may list soft-deleted tasks
pub fn can_view_deleted(principal: &Principal) -> bool {
    principal.is_admin()
}
