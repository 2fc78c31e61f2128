//! # Actions
//!
//! The verb vocabulary permission names are built from. The action is
//! the last dot segment of a permission name (`"users.create"` has the
//! Create action); unknown verbs are allowed, they just parse to `None`.

use serde::{Deserialize, Serialize};

/// Action verbs recognized in permission names.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Read resource data.
    Read,

    /// Write resource data.
    Write,

    /// Delete resource instances.
    Delete,

    /// Administer the resource.
    Manage,

    /// View the resource listing.
    ViewAny,

    /// View a single resource.
    View,

    /// Create new resource instances.
    Create,

    /// Modify existing resource data.
    Update,

    /// Restore soft-deleted resources.
    Restore,

    /// Permanently remove soft-deleted resources.
    ForceDelete,
}

impl Action {
    /// Get the string representation of the action.
    ///
    /// # Returns
    ///
    /// A static string representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Write => "write",
            Action::Delete => "delete",
            Action::Manage => "manage",
            Action::ViewAny => "view_any",
            Action::View => "view",
            Action::Create => "create",
            Action::Update => "update",
            Action::Restore => "restore",
            Action::ForceDelete => "force_delete",
        }
    }

    /// Parse an action from its string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (exact, lowercase)
    ///
    /// # Returns
    ///
    /// `Some(Action)` if valid, `None` otherwise
    ///
    /// # Example
    ///
    /// ```
    /// use warden_core::Action;
    ///
    /// assert_eq!(Action::parse("read"), Some(Action::Read));
    /// assert_eq!(Action::parse("force_delete"), Some(Action::ForceDelete));
    /// assert_eq!(Action::parse("invalid"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "read" => Some(Action::Read),
            "write" => Some(Action::Write),
            "delete" => Some(Action::Delete),
            "manage" => Some(Action::Manage),
            "view_any" => Some(Action::ViewAny),
            "view" => Some(Action::View),
            "create" => Some(Action::Create),
            "update" => Some(Action::Update),
            "restore" => Some(Action::Restore),
            "force_delete" => Some(Action::ForceDelete),
            _ => None,
        }
    }

    /// Get a human-readable label for the action.
    ///
    /// Underscores become spaces and the first letter is capitalized.
    ///
    /// # Examples
    ///
    /// ```
    /// use warden_core::Action;
    ///
    /// assert_eq!(Action::ViewAny.label(), "View any");
    /// assert_eq!(Action::ForceDelete.label(), "Force delete");
    /// ```
    pub fn label(&self) -> String {
        let raw = self.as_str().replace('_', " ");
        let mut chars = raw.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => raw,
        }
    }
}
