//! Request guards
//!
//! Framework-free middleware building blocks. Each guard is built from
//! one or more name specs; a spec may carry several comma-delimited
//! names and the guard flattens them into one list with any-of
//! semantics. `check` takes the authenticated subject as an
//! `Option<Uuid>` so the same guard distinguishes a missing login (401)
//! from a denial (403).
//!
//! Adapting a guard to a web framework is one `match` on
//! [`RbacError::status_code`] in the framework's middleware trait.

use uuid::Uuid;

use crate::engine::Warden;
use crate::error::{RbacError, RbacResult};

/// Split comma-delimited specs into one flat, trimmed name list.
fn flatten<S: AsRef<str>>(specs: &[S]) -> Vec<String> {
    specs
        .iter()
        .flat_map(|spec| spec.as_ref().split(','))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Require at least one of a set of roles.
///
/// # Example
///
/// ```rust,no_run
/// use warden_rbac::RoleGuard;
///
/// let guard = RoleGuard::new(&["admin,editor"]);
/// ```
#[derive(Debug, Clone)]
pub struct RoleGuard {
    roles: Vec<String>,
}

impl RoleGuard {
    /// Build a guard from comma-delimited role specs.
    pub fn new<S: AsRef<str>>(specs: &[S]) -> Self {
        Self {
            roles: flatten(specs),
        }
    }

    /// The flattened role names this guard requires.
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// Pass if the subject holds any of the required roles.
    ///
    /// # Errors
    ///
    /// [`RbacError::AuthenticationRequired`] with no subject,
    /// [`RbacError::RoleNotAssigned`] naming the required roles on a
    /// denial.
    pub async fn check(&self, warden: &Warden, subject: Option<Uuid>) -> RbacResult<()> {
        let user_id = subject.ok_or(RbacError::AuthenticationRequired)?;

        if warden.has_any_role(user_id, &self.roles).await? {
            return Ok(());
        }

        Err(RbacError::RoleNotAssigned(self.roles.join(", ")))
    }
}

/// Require at least one of a set of permissions.
///
/// Each permission check is wildcard-aware, so a subject granted
/// `users.*` passes a `PermissionGuard::new(&["users.create"])`.
#[derive(Debug, Clone)]
pub struct PermissionGuard {
    permissions: Vec<String>,
}

impl PermissionGuard {
    /// Build a guard from comma-delimited permission specs.
    pub fn new<S: AsRef<str>>(specs: &[S]) -> Self {
        Self {
            permissions: flatten(specs),
        }
    }

    /// The flattened permission names this guard requires.
    pub fn permissions(&self) -> &[String] {
        &self.permissions
    }

    /// Pass if the subject holds any of the required permissions.
    ///
    /// # Errors
    ///
    /// [`RbacError::AuthenticationRequired`] with no subject,
    /// [`RbacError::PermissionDenied`] naming the required permissions
    /// on a denial.
    pub async fn check(&self, warden: &Warden, subject: Option<Uuid>) -> RbacResult<()> {
        let user_id = subject.ok_or(RbacError::AuthenticationRequired)?;

        for permission in &self.permissions {
            if warden.has_permission(user_id, &permission.as_str().into()).await? {
                return Ok(());
            }
        }

        Err(RbacError::PermissionDenied(self.permissions.join(", ")))
    }
}

/// Require at least one of a mixed set of role and permission names.
///
/// Each name is tried as a role and as a permission; either match
/// passes.
#[derive(Debug, Clone)]
pub struct RoleOrPermissionGuard {
    names: Vec<String>,
}

impl RoleOrPermissionGuard {
    /// Build a guard from comma-delimited role-or-permission specs.
    pub fn new<S: AsRef<str>>(specs: &[S]) -> Self {
        Self {
            names: flatten(specs),
        }
    }

    /// The flattened names this guard requires.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Pass if any name matches a held role or a held permission.
    ///
    /// # Errors
    ///
    /// [`RbacError::AuthenticationRequired`] with no subject,
    /// [`RbacError::PermissionDenied`] naming the alternatives on a
    /// denial.
    pub async fn check(&self, warden: &Warden, subject: Option<Uuid>) -> RbacResult<()> {
        let user_id = subject.ok_or(RbacError::AuthenticationRequired)?;

        for name in &self.names {
            if warden.has_role(user_id, name).await?
                || warden.has_permission(user_id, &name.as_str().into()).await?
            {
                return Ok(());
            }
        }

        Err(RbacError::PermissionDenied(self.names.join(", ")))
    }
}
