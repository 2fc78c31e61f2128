//! Role domain model
//!
//! A role is a named collection of permissions that can be assigned to
//! users. Role names are globally unique; uniqueness is enforced by the
//! storage backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named collection of permissions, assignable to users.
///
/// Roles carry optional display metadata (`label`, `description`) and a
/// `is_guarded` flag marking protected roles that must not be deleted.
///
/// # Examples
///
/// ```
/// use warden_core::Role;
///
/// let role = Role::new("admin")
///     .with_label("Administrator")
///     .with_description("Full access");
/// assert_eq!(role.name, "admin");
/// assert!(!role.is_guarded);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    /// Unique role ID
    pub id: Uuid,

    /// Globally unique role name
    pub name: String,

    /// Optional human-readable label
    pub label: Option<String>,

    /// Optional description
    pub description: Option<String>,

    /// Whether the role is protected from deletion
    pub is_guarded: bool,

    /// When the role was created
    pub created_at: DateTime<Utc>,
}

impl Role {
    /// Create a new role with the given name.
    ///
    /// The role is created with:
    /// - A newly generated UUID v7 ID
    /// - No label or description
    /// - `is_guarded` unset
    /// - Current timestamp for created_at
    ///
    /// # Arguments
    ///
    /// * `name` - The globally unique role name
    ///
    /// # Examples
    ///
    /// ```
    /// use warden_core::Role;
    ///
    /// let role = Role::new("editor");
    /// assert_eq!(role.name, "editor");
    /// ```
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            label: None,
            description: None,
            is_guarded: false,
            created_at: Utc::now(),
        }
    }

    /// Set the human-readable label.
    ///
    /// # Arguments
    ///
    /// * `label` - The display label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the description.
    ///
    /// # Arguments
    ///
    /// * `description` - The description text
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark the role as guarded.
    ///
    /// Guarded roles are protected: the engine refuses to delete them.
    pub fn guarded(mut self) -> Self {
        self.is_guarded = true;
        self
    }

    /// Check if this role is protected from deletion.
    pub fn is_protected(&self) -> bool {
        self.is_guarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_creation() {
        let role = Role::new("admin").with_label("Administrator");
        assert_eq!(role.name, "admin");
        assert_eq!(role.label.as_deref(), Some("Administrator"));
        assert!(role.description.is_none());
        assert!(!role.is_protected());
    }

    #[test]
    fn test_guarded_role() {
        let role = Role::new("super-admin").guarded();
        assert!(role.is_guarded);
        assert!(role.is_protected());
    }

    #[test]
    fn test_role_ids_are_unique() {
        let a = Role::new("admin");
        let b = Role::new("admin");
        assert_ne!(a.id, b.id);
    }
}
