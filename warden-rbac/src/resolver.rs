//! Reference resolution
//!
//! Turns a [`RoleRef`] or [`PermissionRef`] into a concrete record.
//! Resolution is exact and case-sensitive; there is no fuzzy matching.
//! The strict functions fail with a not-found error on a miss, the
//! lenient `lookup_*` functions return `Ok(None)`.

use crate::error::{RbacError, RbacResult};
use crate::refs::{PermissionRef, RoleRef};
use warden_core::{Permission, Role};
use warden_store::RbacStore;

/// Resolve a role reference, failing if no record matches.
///
/// An already-resolved [`RoleRef::Role`] passes through unchanged
/// without touching storage.
///
/// # Errors
///
/// [`RbacError::RoleNotFound`] when nothing matches.
pub async fn resolve_role(store: &dyn RbacStore, role: &RoleRef) -> RbacResult<Role> {
    lookup_role(store, role)
        .await?
        .ok_or_else(|| RbacError::RoleNotFound(describe_role(role)))
}

/// Resolve a role reference, returning `Ok(None)` if no record matches.
pub async fn lookup_role(store: &dyn RbacStore, role: &RoleRef) -> RbacResult<Option<Role>> {
    match role {
        RoleRef::Role(role) => Ok(Some(role.clone())),
        RoleRef::Id(id) => Ok(store.find_role(*id).await?),
        RoleRef::Name(name) => Ok(store.find_role_by_name(name).await?),
    }
}

/// Resolve a permission reference, failing if no record matches.
///
/// An already-resolved [`PermissionRef::Permission`] passes through
/// unchanged without touching storage.
///
/// # Errors
///
/// [`RbacError::PermissionNotFound`] when nothing matches.
pub async fn resolve_permission(
    store: &dyn RbacStore,
    permission: &PermissionRef,
) -> RbacResult<Permission> {
    lookup_permission(store, permission)
        .await?
        .ok_or_else(|| RbacError::PermissionNotFound(describe_permission(permission)))
}

/// Resolve a permission reference, returning `Ok(None)` if no record
/// matches.
pub async fn lookup_permission(
    store: &dyn RbacStore,
    permission: &PermissionRef,
) -> RbacResult<Option<Permission>> {
    match permission {
        PermissionRef::Permission(permission) => Ok(Some(permission.clone())),
        PermissionRef::Id(id) => Ok(store.find_permission(*id).await?),
        PermissionRef::Name(name) => Ok(store.find_permission_by_name(name).await?),
    }
}

fn describe_role(role: &RoleRef) -> String {
    match role {
        RoleRef::Id(id) => id.to_string(),
        _ => role.name().unwrap_or_default().to_string(),
    }
}

fn describe_permission(permission: &PermissionRef) -> String {
    match permission {
        PermissionRef::Id(id) => id.to_string(),
        _ => permission.name().unwrap_or_default().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use warden_store::MemoryStore;

    #[tokio::test]
    async fn test_resolves_by_name() {
        let store = MemoryStore::new();
        let role = store.create_role(Role::new("admin")).await.unwrap();

        let resolved = resolve_role(&store, &"admin".into()).await.unwrap();
        assert_eq!(resolved.id, role.id);
    }

    #[tokio::test]
    async fn test_resolves_by_id() {
        let store = MemoryStore::new();
        let perm = store
            .create_permission(Permission::new("users.create"))
            .await
            .unwrap();

        let resolved = resolve_permission(&store, &perm.id.into()).await.unwrap();
        assert_eq!(resolved.name, "users.create");
    }

    #[tokio::test]
    async fn test_resolved_entity_passes_through() {
        // No store record exists, yet resolution succeeds: identity pass-through
        let store = MemoryStore::new();
        let role = Role::new("detached");

        let resolved = resolve_role(&store, &(&role).into()).await.unwrap();
        assert_eq!(resolved.id, role.id);
    }

    #[tokio::test]
    async fn test_name_matching_is_exact_and_case_sensitive() {
        let store = MemoryStore::new();
        store.create_role(Role::new("admin")).await.unwrap();

        assert!(lookup_role(&store, &"Admin".into()).await.unwrap().is_none());
        assert!(lookup_role(&store, &"adm".into()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_strict_miss_fails() {
        let store = MemoryStore::new();

        let err = resolve_role(&store, &"ghost".into()).await.unwrap_err();
        assert!(matches!(err, RbacError::RoleNotFound(name) if name == "ghost"));

        let err = resolve_permission(&store, &Uuid::now_v7().into())
            .await
            .unwrap_err();
        assert!(matches!(err, RbacError::PermissionNotFound(_)));
    }

    #[tokio::test]
    async fn test_lenient_miss_is_none() {
        let store = MemoryStore::new();
        assert!(lookup_permission(&store, &"ghost".into())
            .await
            .unwrap()
            .is_none());
    }
}
