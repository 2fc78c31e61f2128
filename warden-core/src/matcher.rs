//! Grant-decision algorithms
//!
//! Free functions deciding whether a required permission or role is
//! covered by a subject's effective name set. Implemented once here and
//! reused by the engine for every subject kind, instead of being
//! duplicated per entity type.

use std::collections::HashSet;

use crate::permission::WILDCARD;

/// Decide whether a required permission is granted by a name set.
///
/// The decision is allow-list only (no negative permissions):
/// 1. Exact match against `granted` grants.
/// 2. With `wildcards_enabled`, any wildcard entry whose dot-delimited
///    prefix matches `required` grants.
/// 3. Otherwise the permission is denied.
///
/// # Arguments
///
/// * `required` - The permission name being checked
/// * `granted` - The subject's effective permission name set
/// * `wildcards_enabled` - Whether wildcard prefix grants apply
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
/// use warden_core::matcher::is_granted;
///
/// let granted: HashSet<String> = ["users.*".to_string()].into_iter().collect();
/// assert!(is_granted("users.create", &granted, true));
/// assert!(!is_granted("users.create", &granted, false));
/// ```
pub fn is_granted(required: &str, granted: &HashSet<String>, wildcards_enabled: bool) -> bool {
    if granted.contains(required) {
        return true;
    }

    if !wildcards_enabled {
        return false;
    }

    granted.iter().any(|grant| matches_wildcard(required, grant))
}

/// Check whether a single wildcard grant covers a required permission.
///
/// A grant matches when it ends in `*` and every dot segment before the
/// terminator equals the corresponding segment of `required`. Empty
/// segments left by stripping the terminator are dropped, so `"users.*"`
/// matches `"users"` itself and a bare `"*"` matches everything.
///
/// # Arguments
///
/// * `required` - The permission name being checked
/// * `grant` - A granted permission name, possibly a wildcard
///
/// # Examples
///
/// ```
/// use warden_core::matcher::matches_wildcard;
///
/// assert!(matches_wildcard("users.create", "users.*"));
/// assert!(matches_wildcard("anything.at.all", "*"));
/// assert!(!matches_wildcard("posts.create", "users.*"));
/// assert!(!matches_wildcard("users.create", "users.create"));
/// ```
pub fn matches_wildcard(required: &str, grant: &str) -> bool {
    if !grant.ends_with(WILDCARD) {
        return false;
    }

    let required_parts: Vec<&str> = required.split('.').collect();
    let grant_parts = grant
        .trim_end_matches(WILDCARD)
        .split('.')
        .filter(|part| !part.is_empty());

    grant_parts
        .enumerate()
        .all(|(index, part)| required_parts.get(index) == Some(&part))
}

/// Check whether the subject holds every one of the given roles.
///
/// An empty `roles` slice is vacuously satisfied.
///
/// # Arguments
///
/// * `roles` - The role names required
/// * `assigned` - The subject's role name set
pub fn has_all_roles<S: AsRef<str>>(roles: &[S], assigned: &HashSet<String>) -> bool {
    roles.iter().all(|role| assigned.contains(role.as_ref()))
}

/// Check whether the subject holds at least one of the given roles.
///
/// # Arguments
///
/// * `roles` - The role names, any of which suffices
/// * `assigned` - The subject's role name set
pub fn has_any_role<S: AsRef<str>>(roles: &[S], assigned: &HashSet<String>) -> bool {
    roles.iter().any(|role| assigned.contains(role.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> HashSet<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_exact_match() {
        let granted = set(&["users.create"]);
        assert!(is_granted("users.create", &granted, true));
        assert!(!is_granted("users.delete", &granted, true));
    }

    #[test]
    fn test_wildcard_match() {
        let granted = set(&["users.*"]);
        assert!(is_granted("users.create", &granted, true));
        assert!(is_granted("users.delete", &granted, true));
        assert!(!is_granted("posts.create", &granted, true));
    }

    #[test]
    fn test_wildcard_disabled() {
        let granted = set(&["users.*"]);
        assert!(!is_granted("users.create", &granted, false));
        // Exact match on the wildcard name itself still works
        assert!(is_granted("users.*", &granted, false));
    }

    #[test]
    fn test_wildcard_prefix_depth() {
        // The grant prefix must be no longer than the required path
        assert!(matches_wildcard("users.roles.assign", "users.*"));
        assert!(matches_wildcard("users.roles.assign", "users.roles.*"));
        assert!(!matches_wildcard("users", "users.roles.*"));
    }

    #[test]
    fn test_wildcard_matches_own_group() {
        // Empty trailing segments are dropped: "users.*" covers "users"
        assert!(matches_wildcard("users", "users.*"));
    }

    #[test]
    fn test_bare_wildcard_matches_everything() {
        assert!(matches_wildcard("users.create", "*"));
        assert!(matches_wildcard("posts", "*"));
    }

    #[test]
    fn test_non_wildcard_grant_never_prefix_matches() {
        assert!(!matches_wildcard("users.create", "users"));
        assert!(!matches_wildcard("users.create.extra", "users.create"));
    }

    #[test]
    fn test_segments_compared_whole() {
        // "user*" must not match "users.create": segments compare whole
        assert!(!matches_wildcard("users.create", "user*"));
    }

    #[test]
    fn test_role_set_helpers() {
        let assigned = set(&["admin", "editor"]);
        assert!(has_all_roles(&["admin", "editor"], &assigned));
        assert!(!has_all_roles(&["admin", "moderator"], &assigned));
        assert!(has_any_role(&["editor", "moderator"], &assigned));
        assert!(!has_any_role(&["x", "y"], &assigned));
        assert!(has_all_roles::<&str>(&[], &assigned));
        assert!(!has_any_role::<&str>(&[], &assigned));
    }
}
