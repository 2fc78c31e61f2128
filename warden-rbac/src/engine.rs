//! The authorization engine
//!
//! [`Warden`] owns the storage and cache collaborators and implements
//! the association layer and the decision gateway. Every mutation
//! follows the same ordering contract: the association write completes
//! first, then the catalog cache is invalidated, and only then does the
//! call return. A reader starting after a mutator returns therefore
//! sees either the old complete state or the new complete state.
//!
//! Decisions (`has_role`, `has_permission`, ...) are pure reads over
//! the subject's live associations; they never consult the cached
//! catalogs.

use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::catalog::CatalogCache;
use crate::config::RbacConfig;
use crate::error::{RbacError, RbacResult};
use crate::refs::{PermissionRef, RoleRef};
use crate::resolver::{lookup_permission, lookup_role, resolve_permission, resolve_role};
use warden_core::{matcher, Permission, Role};
use warden_store::{CacheStore, RbacStore, SyncDelta};

/// The authorization engine: entity lifecycle, associations, and
/// decisions, backed by an [`RbacStore`] and a [`CacheStore`].
///
/// Constructed once at startup and shared by reference.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use warden_rbac::{RbacConfig, Warden};
/// use warden_store::{MemoryCache, MemoryStore};
///
/// let warden = Warden::new(
///     Arc::new(MemoryStore::new()),
///     Arc::new(MemoryCache::new()),
///     RbacConfig::default(),
/// );
/// ```
pub struct Warden {
    store: Arc<dyn RbacStore>,
    catalogs: CatalogCache,
    config: RbacConfig,
}

impl std::fmt::Debug for Warden {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Warden").field("config", &self.config).finish()
    }
}

impl Warden {
    /// Create a new engine over the given collaborators.
    pub fn new(
        store: Arc<dyn RbacStore>,
        cache: Arc<dyn CacheStore>,
        config: RbacConfig,
    ) -> Self {
        let catalogs = CatalogCache::new(Arc::clone(&store), cache, config.clone());
        Self {
            store,
            catalogs,
            config,
        }
    }

    /// The catalog cache coordinator.
    pub fn catalogs(&self) -> &CatalogCache {
        &self.catalogs
    }

    /// The engine configuration.
    pub fn config(&self) -> &RbacConfig {
        &self.config
    }

    /// The backing store.
    pub fn store(&self) -> &dyn RbacStore {
        self.store.as_ref()
    }

    // -- Entity lifecycle ----------------------------------------------

    /// Create a role.
    ///
    /// Fails with a storage duplicate-name error if the name is taken;
    /// use [`find_or_create_role`](Warden::find_or_create_role) for
    /// idempotent creation.
    pub async fn create_role(&self, name: &str, label: Option<&str>) -> RbacResult<Role> {
        let mut role = Role::new(name);
        if let Some(label) = label {
            role = role.with_label(label);
        }

        let role = self.store.create_role(role).await?;
        self.catalogs.invalidate().await?;
        tracing::debug!(role = %role.name, "role created");

        Ok(role)
    }

    /// Find a role by name, creating it if absent.
    ///
    /// # Returns
    ///
    /// The role and whether it was newly created.
    pub async fn find_or_create_role(
        &self,
        name: &str,
        label: Option<&str>,
    ) -> RbacResult<(Role, bool)> {
        if let Some(role) = self.store.find_role_by_name(name).await? {
            return Ok((role, false));
        }

        let role = self.create_role(name, label).await?;
        Ok((role, true))
    }

    /// Create a permission.
    ///
    /// `is_wildcard` and `group` are computed from the name at creation
    /// time. Fails with a storage duplicate-name error if the name is
    /// taken; use
    /// [`find_or_create_permission`](Warden::find_or_create_permission)
    /// for idempotent creation.
    pub async fn create_permission(
        &self,
        name: &str,
        label: Option<&str>,
    ) -> RbacResult<Permission> {
        let mut permission = Permission::new(name);
        if let Some(label) = label {
            permission = permission.with_label(label);
        }

        let permission = self.store.create_permission(permission).await?;
        self.catalogs.invalidate().await?;
        tracing::debug!(permission = %permission.name, "permission created");

        Ok(permission)
    }

    /// Find a permission by name, creating it if absent.
    ///
    /// # Returns
    ///
    /// The permission and whether it was newly created.
    pub async fn find_or_create_permission(
        &self,
        name: &str,
        label: Option<&str>,
    ) -> RbacResult<(Permission, bool)> {
        if let Some(permission) = self.store.find_permission_by_name(name).await? {
            return Ok((permission, false));
        }

        let permission = self.create_permission(name, label).await?;
        Ok((permission, true))
    }

    /// Delete a role and its links.
    ///
    /// Guarded roles refuse deletion. Returns whether a record existed.
    ///
    /// # Errors
    ///
    /// [`RbacError::RoleProtected`] when the role is guarded.
    pub async fn delete_role(&self, role: &RoleRef) -> RbacResult<bool> {
        let role = match lookup_role(self.store.as_ref(), role).await? {
            Some(role) => role,
            None => return Ok(false),
        };

        if role.is_protected() {
            return Err(RbacError::RoleProtected(role.name));
        }

        let existed = self.store.delete_role(role.id).await?;
        self.catalogs.invalidate().await?;

        Ok(existed)
    }

    /// Delete a permission and its links. Returns whether a record
    /// existed.
    pub async fn delete_permission(&self, permission: &PermissionRef) -> RbacResult<bool> {
        let permission = match lookup_permission(self.store.as_ref(), permission).await? {
            Some(permission) => permission,
            None => return Ok(false),
        };

        let existed = self.store.delete_permission(permission.id).await?;
        self.catalogs.invalidate().await?;

        Ok(existed)
    }

    // -- Role ↔ permission associations --------------------------------

    /// Idempotently grant a permission to a role.
    ///
    /// Granting twice is a no-op, not an error.
    pub async fn give_permission_to(
        &self,
        role: &RoleRef,
        permission: &PermissionRef,
    ) -> RbacResult<Role> {
        let role = resolve_role(self.store.as_ref(), role).await?;
        let permission = resolve_permission(self.store.as_ref(), permission).await?;

        self.store.attach_permission(role.id, permission.id).await?;
        self.catalogs.invalidate().await?;
        tracing::debug!(role = %role.name, permission = %permission.name, "permission granted");

        Ok(role)
    }

    /// Replace a role's permission set with exactly the given refs.
    ///
    /// Refs may mix IDs and names; names that resolve to nothing are
    /// dropped. An empty slice detaches everything.
    ///
    /// # Returns
    ///
    /// The delta of attached and detached permission IDs.
    pub async fn sync_permissions(
        &self,
        role: &RoleRef,
        permissions: &[PermissionRef],
    ) -> RbacResult<SyncDelta> {
        let role = resolve_role(self.store.as_ref(), role).await?;
        let ids = self.permission_ids(permissions).await?;

        let delta = self.store.sync_role_permissions(role.id, &ids, true).await?;
        self.catalogs.invalidate().await?;

        Ok(delta)
    }

    /// Revoke a permission from a role. Returns the number of links
    /// removed.
    pub async fn revoke_permission_to(
        &self,
        role: &RoleRef,
        permission: &PermissionRef,
    ) -> RbacResult<u64> {
        let role = resolve_role(self.store.as_ref(), role).await?;
        let permission = resolve_permission(self.store.as_ref(), permission).await?;

        let detached = self.store.detach_permission(role.id, permission.id).await?;
        self.catalogs.invalidate().await?;

        Ok(detached)
    }

    /// Revoke every permission from a role. Returns the number removed.
    pub async fn revoke_all_permissions(&self, role: &RoleRef) -> RbacResult<u64> {
        let role = resolve_role(self.store.as_ref(), role).await?;

        let detached = self.store.detach_all_permissions(role.id).await?;
        self.catalogs.invalidate().await?;

        Ok(detached)
    }

    /// Check whether a role holds a specific permission link.
    ///
    /// This is a link-existence test, not a wildcard decision; an
    /// unresolvable permission ref reads as not held.
    pub async fn role_has_permission(
        &self,
        role: &RoleRef,
        permission: &PermissionRef,
    ) -> RbacResult<bool> {
        let role = resolve_role(self.store.as_ref(), role).await?;
        let permission = match lookup_permission(self.store.as_ref(), permission).await? {
            Some(permission) => permission,
            None => return Ok(false),
        };

        Ok(self.store.has_permission_link(role.id, permission.id).await?)
    }

    /// The names of a role's linked permissions.
    pub async fn role_permission_names(&self, role: &RoleRef) -> RbacResult<Vec<String>> {
        let role = resolve_role(self.store.as_ref(), role).await?;
        let permissions = self.store.role_permissions(role.id).await?;

        Ok(permissions.into_iter().map(|p| p.name).collect())
    }

    // -- Permission ↔ role associations (inverse direction) ------------

    /// Idempotently link a role to a permission.
    ///
    /// The inverse of [`give_permission_to`](Warden::give_permission_to),
    /// over the same link table.
    pub async fn give_role_to_permission(
        &self,
        permission: &PermissionRef,
        role: &RoleRef,
    ) -> RbacResult<Permission> {
        let permission = resolve_permission(self.store.as_ref(), permission).await?;
        let role = resolve_role(self.store.as_ref(), role).await?;

        self.store.attach_permission(role.id, permission.id).await?;
        self.catalogs.invalidate().await?;

        Ok(permission)
    }

    /// Replace a permission's role set with exactly the given refs.
    pub async fn sync_permission_roles(
        &self,
        permission: &PermissionRef,
        roles: &[RoleRef],
    ) -> RbacResult<SyncDelta> {
        let permission = resolve_permission(self.store.as_ref(), permission).await?;
        let ids = self.role_ids(roles).await?;

        let delta = self
            .store
            .sync_permission_roles(permission.id, &ids, true)
            .await?;
        self.catalogs.invalidate().await?;

        Ok(delta)
    }

    /// Unlink a role from a permission. An unresolvable role ref
    /// removes nothing.
    pub async fn revoke_role_from_permission(
        &self,
        permission: &PermissionRef,
        role: &RoleRef,
    ) -> RbacResult<u64> {
        let permission = resolve_permission(self.store.as_ref(), permission).await?;
        let role = match lookup_role(self.store.as_ref(), role).await? {
            Some(role) => role,
            None => return Ok(0),
        };

        let detached = self.store.detach_permission(role.id, permission.id).await?;
        self.catalogs.invalidate().await?;

        Ok(detached)
    }

    /// The names of the roles a permission is linked to.
    pub async fn permission_role_names(&self, permission: &PermissionRef) -> RbacResult<Vec<String>> {
        let permission = resolve_permission(self.store.as_ref(), permission).await?;
        let roles = self.store.permission_roles(permission.id).await?;

        Ok(roles.into_iter().map(|r| r.name).collect())
    }

    // -- User ↔ role associations --------------------------------------

    /// Idempotently assign a role to a user.
    ///
    /// Returns whether the assignment was newly created; assigning an
    /// already-held role is a no-op rather than a duplicate grant.
    pub async fn assign_role(&self, user_id: Uuid, role: &RoleRef) -> RbacResult<bool> {
        let role = resolve_role(self.store.as_ref(), role).await?;

        let attached = self.store.attach_role(user_id, role.id).await?;
        self.catalogs.invalidate().await?;
        tracing::debug!(%user_id, role = %role.name, "role assigned");

        Ok(attached)
    }

    /// Replace a user's role set with exactly the given refs.
    ///
    /// With `detach_others` false the sync is additive only. Refs may
    /// mix IDs and names; unresolvable names are dropped.
    pub async fn sync_roles(
        &self,
        user_id: Uuid,
        roles: &[RoleRef],
        detach_others: bool,
    ) -> RbacResult<SyncDelta> {
        let ids = self.role_ids(roles).await?;

        let delta = self.store.sync_user_roles(user_id, &ids, detach_others).await?;
        self.catalogs.invalidate().await?;

        Ok(delta)
    }

    /// Revoke a role from a user. An unresolvable role ref removes
    /// nothing. Returns the number of links removed.
    pub async fn revoke_role(&self, user_id: Uuid, role: &RoleRef) -> RbacResult<u64> {
        let role = match lookup_role(self.store.as_ref(), role).await? {
            Some(role) => role,
            None => return Ok(0),
        };

        let detached = self.store.detach_role(user_id, role.id).await?;
        self.catalogs.invalidate().await?;

        Ok(detached)
    }

    /// Revoke every role from a user. Returns the number removed.
    pub async fn revoke_roles(&self, user_id: Uuid) -> RbacResult<u64> {
        let detached = self.store.detach_all_roles(user_id).await?;
        self.catalogs.invalidate().await?;

        Ok(detached)
    }

    // -- User ↔ permission direct grants -------------------------------

    /// Grant a permission directly to a user, bypassing roles.
    ///
    /// Direct grants join the user's role-derived permissions in every
    /// decision. Returns whether the grant was newly created.
    pub async fn give_permission_to_user(
        &self,
        user_id: Uuid,
        permission: &PermissionRef,
    ) -> RbacResult<bool> {
        let permission = resolve_permission(self.store.as_ref(), permission).await?;

        let attached = self.store.attach_user_permission(user_id, permission.id).await?;
        self.catalogs.invalidate().await?;

        Ok(attached)
    }

    /// Revoke a direct permission grant. An unresolvable ref removes
    /// nothing.
    pub async fn revoke_permission_from_user(
        &self,
        user_id: Uuid,
        permission: &PermissionRef,
    ) -> RbacResult<u64> {
        let permission = match lookup_permission(self.store.as_ref(), permission).await? {
            Some(permission) => permission,
            None => return Ok(0),
        };

        let detached = self.store.detach_user_permission(user_id, permission.id).await?;
        self.catalogs.invalidate().await?;

        Ok(detached)
    }

    // -- Decisions -----------------------------------------------------

    /// The names of the roles assigned to a user.
    pub async fn role_names(&self, user_id: Uuid) -> RbacResult<HashSet<String>> {
        let roles = self.store.user_roles(user_id).await?;
        Ok(roles.into_iter().map(|r| r.name).collect())
    }

    /// Check whether a user holds a role. Exact membership test.
    pub async fn has_role(&self, user_id: Uuid, role: &str) -> RbacResult<bool> {
        Ok(self.role_names(user_id).await?.contains(role))
    }

    /// Check whether a user holds at least one of the given roles.
    pub async fn has_any_role<S: AsRef<str>>(
        &self,
        user_id: Uuid,
        roles: &[S],
    ) -> RbacResult<bool> {
        let assigned = self.role_names(user_id).await?;
        Ok(matcher::has_any_role(roles, &assigned))
    }

    /// Check whether a user holds every one of the given roles.
    pub async fn has_all_roles<S: AsRef<str>>(
        &self,
        user_id: Uuid,
        roles: &[S],
    ) -> RbacResult<bool> {
        let assigned = self.role_names(user_id).await?;
        Ok(matcher::has_all_roles(roles, &assigned))
    }

    /// A user's effective permission names: the union of every assigned
    /// role's permissions and any direct grants.
    pub async fn permission_names(&self, user_id: Uuid) -> RbacResult<HashSet<String>> {
        let mut names = HashSet::new();

        for role in self.store.user_roles(user_id).await? {
            for permission in self.store.role_permissions(role.id).await? {
                names.insert(permission.name);
            }
        }

        for permission in self.store.user_permissions(user_id).await? {
            names.insert(permission.name);
        }

        Ok(names)
    }

    /// Decide whether a user holds a permission.
    ///
    /// The ref is normalized to a name before matching: exact first,
    /// then wildcard prefix grants when enabled. An ID ref that
    /// resolves to nothing reads as denied.
    pub async fn has_permission(
        &self,
        user_id: Uuid,
        permission: &PermissionRef,
    ) -> RbacResult<bool> {
        let name = match permission.name() {
            Some(name) => name.to_string(),
            None => match lookup_permission(self.store.as_ref(), permission).await? {
                Some(permission) => permission.name,
                None => return Ok(false),
            },
        };

        let granted = self.permission_names(user_id).await?;
        Ok(matcher::is_granted(&name, &granted, self.config.wildcards_enabled))
    }

    // -- Ref mapping ---------------------------------------------------

    /// Map permission refs to IDs, dropping unresolvable names.
    async fn permission_ids(&self, permissions: &[PermissionRef]) -> RbacResult<Vec<Uuid>> {
        let mut ids = Vec::with_capacity(permissions.len());
        for permission in permissions {
            match permission {
                PermissionRef::Id(id) => ids.push(*id),
                _ => {
                    if let Some(found) =
                        lookup_permission(self.store.as_ref(), permission).await?
                    {
                        ids.push(found.id);
                    }
                }
            }
        }
        Ok(ids)
    }

    /// Map role refs to IDs, dropping unresolvable names.
    async fn role_ids(&self, roles: &[RoleRef]) -> RbacResult<Vec<Uuid>> {
        let mut ids = Vec::with_capacity(roles.len());
        for role in roles {
            match role {
                RoleRef::Id(id) => ids.push(*id),
                _ => {
                    if let Some(found) = lookup_role(self.store.as_ref(), role).await? {
                        ids.push(found.id);
                    }
                }
            }
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_store::{MemoryCache, MemoryStore};

    fn warden() -> Warden {
        Warden::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryCache::new()),
            RbacConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_create_role_and_permission() {
        let warden = warden();

        let role = warden.create_role("admin", Some("Administrator")).await.unwrap();
        assert_eq!(role.name, "admin");
        assert_eq!(role.label.as_deref(), Some("Administrator"));

        let perm = warden.create_permission("users.*", None).await.unwrap();
        assert!(perm.is_wildcard());
        assert_eq!(perm.group(), "users");
    }

    #[tokio::test]
    async fn test_duplicate_create_fails_find_or_create_does_not() {
        let warden = warden();
        warden.create_role("admin", None).await.unwrap();

        let err = warden.create_role("admin", None).await.unwrap_err();
        assert!(matches!(err, RbacError::Store(e) if e.is_duplicate()));

        let (role, created) = warden.find_or_create_role("admin", None).await.unwrap();
        assert_eq!(role.name, "admin");
        assert!(!created);

        let (_, created) = warden.find_or_create_role("editor", None).await.unwrap();
        assert!(created);
    }

    #[tokio::test]
    async fn test_guarded_role_refuses_deletion() {
        let warden = warden();
        let role = warden
            .store
            .create_role(Role::new("root").guarded())
            .await
            .unwrap();

        let err = warden.delete_role(&role.id.into()).await.unwrap_err();
        assert!(matches!(err, RbacError::RoleProtected(name) if name == "root"));
        assert!(warden.store.find_role(role.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_missing_role_is_false() {
        let warden = warden();
        assert!(!warden.delete_role(&"ghost".into()).await.unwrap());
    }

    #[tokio::test]
    async fn test_grant_and_decide() {
        let warden = warden();
        warden.create_role("admin", None).await.unwrap();
        warden.create_permission("users.create", None).await.unwrap();
        warden
            .give_permission_to(&"admin".into(), &"users.create".into())
            .await
            .unwrap();

        let user_id = Uuid::now_v7();
        warden.assign_role(user_id, &"admin".into()).await.unwrap();

        assert!(warden.has_permission(user_id, &"users.create".into()).await.unwrap());
        assert!(!warden.has_permission(user_id, &"users.delete".into()).await.unwrap());
    }

    #[tokio::test]
    async fn test_wildcard_decision_respects_config() {
        let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
        let warden = Warden::new(
            store.clone(),
            Arc::new(MemoryCache::new()),
            RbacConfig::default().without_wildcards(),
        );

        warden.create_role("admin", None).await.unwrap();
        warden.create_permission("users.*", None).await.unwrap();
        warden
            .give_permission_to(&"admin".into(), &"users.*".into())
            .await
            .unwrap();

        let user_id = Uuid::now_v7();
        warden.assign_role(user_id, &"admin".into()).await.unwrap();

        assert!(!warden.has_permission(user_id, &"users.create".into()).await.unwrap());
        // The wildcard name itself still matches exactly
        assert!(warden.has_permission(user_id, &"users.*".into()).await.unwrap());
    }

    #[tokio::test]
    async fn test_sync_drops_unknown_names() {
        let warden = warden();
        let role = warden.create_role("admin", None).await.unwrap();
        let a = warden.create_permission("a", None).await.unwrap();

        let delta = warden
            .sync_permissions(
                &role.name.as_str().into(),
                &[a.id.into(), "ghost".into()],
            )
            .await
            .unwrap();

        assert_eq!(delta.attached, vec![a.id]);
        assert_eq!(
            warden.role_permission_names(&"admin".into()).await.unwrap(),
            vec!["a"]
        );
    }

    #[tokio::test]
    async fn test_assign_role_is_idempotent() {
        let warden = warden();
        warden.create_role("admin", None).await.unwrap();
        let user_id = Uuid::now_v7();

        assert!(warden.assign_role(user_id, &"admin".into()).await.unwrap());
        assert!(!warden.assign_role(user_id, &"admin".into()).await.unwrap());
        assert_eq!(warden.role_names(user_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_role_checks() {
        let warden = warden();
        warden.create_role("admin", None).await.unwrap();
        warden.create_role("editor", None).await.unwrap();

        let user_id = Uuid::now_v7();
        warden.assign_role(user_id, &"admin".into()).await.unwrap();
        warden.assign_role(user_id, &"editor".into()).await.unwrap();

        assert!(warden.has_role(user_id, "admin").await.unwrap());
        assert!(!warden.has_role(user_id, "moderator").await.unwrap());
        assert!(warden
            .has_all_roles(user_id, &["admin", "editor"])
            .await
            .unwrap());
        assert!(!warden
            .has_all_roles(user_id, &["admin", "moderator"])
            .await
            .unwrap());
        assert!(warden
            .has_any_role(user_id, &["editor", "moderator"])
            .await
            .unwrap());
        assert!(!warden.has_any_role(user_id, &["x", "y"]).await.unwrap());
    }

    #[tokio::test]
    async fn test_direct_grants_union_with_role_grants() {
        let warden = warden();
        warden.create_role("editor", None).await.unwrap();
        warden.create_permission("posts.update", None).await.unwrap();
        warden.create_permission("posts.publish", None).await.unwrap();
        warden
            .give_permission_to(&"editor".into(), &"posts.update".into())
            .await
            .unwrap();

        let user_id = Uuid::now_v7();
        warden.assign_role(user_id, &"editor".into()).await.unwrap();
        warden
            .give_permission_to_user(user_id, &"posts.publish".into())
            .await
            .unwrap();

        let names = warden.permission_names(user_id).await.unwrap();
        assert!(names.contains("posts.update"));
        assert!(names.contains("posts.publish"));

        warden
            .revoke_permission_from_user(user_id, &"posts.publish".into())
            .await
            .unwrap();
        assert!(!warden.has_permission(user_id, &"posts.publish".into()).await.unwrap());
        assert!(warden.has_permission(user_id, &"posts.update".into()).await.unwrap());
    }

    #[tokio::test]
    async fn test_inverse_permission_role_operations() {
        let warden = warden();
        warden.create_role("admin", None).await.unwrap();
        warden.create_role("editor", None).await.unwrap();
        warden.create_permission("reports.view", None).await.unwrap();

        warden
            .give_role_to_permission(&"reports.view".into(), &"admin".into())
            .await
            .unwrap();
        assert_eq!(
            warden
                .permission_role_names(&"reports.view".into())
                .await
                .unwrap(),
            vec!["admin"]
        );

        warden
            .sync_permission_roles(&"reports.view".into(), &["editor".into()])
            .await
            .unwrap();
        assert_eq!(
            warden
                .permission_role_names(&"reports.view".into())
                .await
                .unwrap(),
            vec!["editor"]
        );

        let detached = warden
            .revoke_role_from_permission(&"reports.view".into(), &"editor".into())
            .await
            .unwrap();
        assert_eq!(detached, 1);
    }

    #[tokio::test]
    async fn test_has_permission_by_unknown_id_is_denied() {
        let warden = warden();
        let user_id = Uuid::now_v7();
        assert!(!warden
            .has_permission(user_id, &Uuid::now_v7().into())
            .await
            .unwrap());
    }
}
