//! Permission domain model
//!
//! A permission is a named, atomic grantable capability. Names are
//! conventionally dot-delimited hierarchical paths (`"users.create"`);
//! a trailing `*` makes the permission a wildcard prefix grant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::action::Action;

/// The wildcard terminator character for permission names.
pub const WILDCARD: char = '*';

/// A named grantable capability, optionally a wildcard prefix grant.
///
/// `is_wildcard` and `group` are derived from the name at creation time:
/// a name ending in `*` is a wildcard, and the group is the substring
/// before the first dot (the whole name for single-segment names).
/// Renames are out of scope, so neither field is ever recomputed.
///
/// # Examples
///
/// ```
/// use warden_core::Permission;
///
/// let perm = Permission::new("users.create");
/// assert_eq!(perm.group(), "users");
/// assert!(!perm.is_wildcard());
///
/// let wild = Permission::new("users.*");
/// assert!(wild.is_wildcard());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Permission {
    /// Unique permission ID
    pub id: Uuid,

    /// Globally unique permission name (dot-delimited path)
    pub name: String,

    /// Optional human-readable label
    pub label: Option<String>,

    /// Optional description
    pub description: Option<String>,

    /// Group the permission belongs to (segment before the first dot)
    pub group: String,

    /// Whether the name ends with the wildcard terminator
    pub is_wildcard: bool,

    /// When the permission was created
    pub created_at: DateTime<Utc>,
}

impl Permission {
    /// Create a new permission with the given name.
    ///
    /// The permission is created with:
    /// - A newly generated UUID v7 ID
    /// - `group` derived from the segment before the first dot
    /// - `is_wildcard` set when the name ends in `*`
    /// - Current timestamp for created_at
    ///
    /// # Arguments
    ///
    /// * `name` - The globally unique permission name
    ///
    /// # Examples
    ///
    /// ```
    /// use warden_core::Permission;
    ///
    /// let perm = Permission::new("posts.update");
    /// assert_eq!(perm.group(), "posts");
    /// ```
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let group = derive_group(&name).to_string();
        let is_wildcard = name.ends_with(WILDCARD);

        Self {
            id: Uuid::now_v7(),
            name,
            label: None,
            description: None,
            group,
            is_wildcard,
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

    /// Check if this is a wildcard prefix grant.
    pub fn is_wildcard(&self) -> bool {
        self.is_wildcard
    }

    /// Get the permission group (segment before the first dot).
    ///
    /// Single-segment names group as themselves.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Get the action verb, parsed from the last dot segment.
    ///
    /// # Returns
    ///
    /// `Some(Action)` when the last segment is a known verb, `None`
    /// otherwise (including for wildcard names).
    ///
    /// # Examples
    ///
    /// ```
    /// use warden_core::{Action, Permission};
    ///
    /// assert_eq!(Permission::new("posts.create").action(), Some(Action::Create));
    /// assert_eq!(Permission::new("posts.frobnicate").action(), None);
    /// ```
    pub fn action(&self) -> Option<Action> {
        self.name.rsplit('.').next().and_then(Action::parse)
    }
}

/// Derive the group from a permission name.
fn derive_group(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}
