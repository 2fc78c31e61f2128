//! In-memory backends
//!
//! Process-local [`RbacStore`] and [`CacheStore`] implementations
//! suitable for single-process applications and testing. Link tables
//! are kept as ID-pair sets, so attach is naturally idempotent.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::cache::CacheStore;
use crate::error::{StoreError, StoreResult};
use crate::store::{RbacStore, SyncDelta};
use warden_core::{Permission, Role};

#[derive(Default)]
struct Inner {
    roles: HashMap<Uuid, Role>,
    permissions: HashMap<Uuid, Permission>,
    /// role_id -> permission_ids
    role_permissions: HashMap<Uuid, HashSet<Uuid>>,
    /// user_id -> role_ids
    user_roles: HashMap<Uuid, HashSet<Uuid>>,
    /// user_id -> permission_ids (direct grants)
    user_permissions: HashMap<Uuid, HashSet<Uuid>>,
}

/// In-memory store implementation.
///
/// # Example
///
/// ```rust,no_run
/// use warden_core::Role;
/// use warden_store::{MemoryStore, RbacStore};
///
/// # async fn example() -> warden_store::StoreResult<()> {
/// let store = MemoryStore::new();
/// let role = store.create_role(Role::new("admin")).await?;
/// assert!(store.find_role_by_name("admin").await?.is_some());
/// # Ok(())
/// # }
/// ```
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
    tables_ready: bool,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").finish()
    }
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            tables_ready: true,
        }
    }

    /// A store whose schema probe reports the tables as absent.
    ///
    /// Mirrors a backend that has not been migrated yet, for exercising
    /// boot paths that must tolerate a missing schema.
    pub fn without_tables(self) -> Self {
        Self {
            tables_ready: false,
            ..self
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace (or extend) the ID set under `key` with `ids`, producing the
/// delta. Shared by all sync operations.
fn sync_links(
    links: &mut HashMap<Uuid, HashSet<Uuid>>,
    key: Uuid,
    ids: &[Uuid],
    detach_others: bool,
) -> SyncDelta {
    let target: HashSet<Uuid> = ids.iter().copied().collect();
    let current = links.entry(key).or_default();

    let attached: Vec<Uuid> = target.difference(current).copied().collect();
    let detached: Vec<Uuid> = if detach_others {
        current.difference(&target).copied().collect()
    } else {
        Vec::new()
    };

    if detach_others {
        *current = target;
    } else {
        current.extend(&target);
    }

    SyncDelta { attached, detached }
}

fn sorted_by_name<T: Clone>(items: Vec<T>, name: impl Fn(&T) -> &str) -> Vec<T> {
    let mut items = items;
    items.sort_by(|a, b| name(a).cmp(name(b)));
    items
}

#[async_trait]
impl RbacStore for MemoryStore {
    async fn create_role(&self, role: Role) -> StoreResult<Role> {
        let mut inner = self.inner.write().await;

        if inner.roles.values().any(|existing| existing.name == role.name) {
            return Err(StoreError::DuplicateName {
                entity: "role",
                name: role.name,
            });
        }

        inner.roles.insert(role.id, role.clone());
        Ok(role)
    }

    async fn find_role(&self, id: Uuid) -> StoreResult<Option<Role>> {
        Ok(self.inner.read().await.roles.get(&id).cloned())
    }

    async fn find_role_by_name(&self, name: &str) -> StoreResult<Option<Role>> {
        let inner = self.inner.read().await;
        Ok(inner.roles.values().find(|role| role.name == name).cloned())
    }

    async fn delete_role(&self, id: Uuid) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;

        let existed = inner.roles.remove(&id).is_some();
        if existed {
            inner.role_permissions.remove(&id);
            for assigned in inner.user_roles.values_mut() {
                assigned.remove(&id);
            }
        }

        Ok(existed)
    }

    async fn all_roles(&self) -> StoreResult<Vec<Role>> {
        let inner = self.inner.read().await;
        Ok(sorted_by_name(
            inner.roles.values().cloned().collect(),
            |role| role.name.as_str(),
        ))
    }

    async fn create_permission(&self, permission: Permission) -> StoreResult<Permission> {
        let mut inner = self.inner.write().await;

        if inner
            .permissions
            .values()
            .any(|existing| existing.name == permission.name)
        {
            return Err(StoreError::DuplicateName {
                entity: "permission",
                name: permission.name,
            });
        }

        inner.permissions.insert(permission.id, permission.clone());
        Ok(permission)
    }

    async fn find_permission(&self, id: Uuid) -> StoreResult<Option<Permission>> {
        Ok(self.inner.read().await.permissions.get(&id).cloned())
    }

    async fn find_permission_by_name(&self, name: &str) -> StoreResult<Option<Permission>> {
        let inner = self.inner.read().await;
        Ok(inner
            .permissions
            .values()
            .find(|permission| permission.name == name)
            .cloned())
    }

    async fn delete_permission(&self, id: Uuid) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;

        let existed = inner.permissions.remove(&id).is_some();
        if existed {
            for linked in inner.role_permissions.values_mut() {
                linked.remove(&id);
            }
            for granted in inner.user_permissions.values_mut() {
                granted.remove(&id);
            }
        }

        Ok(existed)
    }

    async fn all_permissions(&self) -> StoreResult<Vec<Permission>> {
        let inner = self.inner.read().await;
        Ok(sorted_by_name(
            inner.permissions.values().cloned().collect(),
            |permission| permission.name.as_str(),
        ))
    }

    async fn attach_permission(&self, role_id: Uuid, permission_id: Uuid) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .role_permissions
            .entry(role_id)
            .or_default()
            .insert(permission_id))
    }

    async fn detach_permission(&self, role_id: Uuid, permission_id: Uuid) -> StoreResult<u64> {
        let mut inner = self.inner.write().await;
        let removed = inner
            .role_permissions
            .get_mut(&role_id)
            .is_some_and(|linked| linked.remove(&permission_id));
        Ok(u64::from(removed))
    }

    async fn detach_all_permissions(&self, role_id: Uuid) -> StoreResult<u64> {
        let mut inner = self.inner.write().await;
        let removed = inner
            .role_permissions
            .remove(&role_id)
            .map_or(0, |linked| linked.len());
        Ok(removed as u64)
    }

    async fn sync_role_permissions(
        &self,
        role_id: Uuid,
        permission_ids: &[Uuid],
        detach_others: bool,
    ) -> StoreResult<SyncDelta> {
        let mut inner = self.inner.write().await;
        Ok(sync_links(
            &mut inner.role_permissions,
            role_id,
            permission_ids,
            detach_others,
        ))
    }

    async fn has_permission_link(&self, role_id: Uuid, permission_id: Uuid) -> StoreResult<bool> {
        let inner = self.inner.read().await;
        Ok(inner
            .role_permissions
            .get(&role_id)
            .is_some_and(|linked| linked.contains(&permission_id)))
    }

    async fn role_permissions(&self, role_id: Uuid) -> StoreResult<Vec<Permission>> {
        let inner = self.inner.read().await;
        let linked = match inner.role_permissions.get(&role_id) {
            Some(linked) => linked,
            None => return Ok(Vec::new()),
        };

        Ok(sorted_by_name(
            linked
                .iter()
                .filter_map(|id| inner.permissions.get(id).cloned())
                .collect(),
            |permission| permission.name.as_str(),
        ))
    }

    async fn permission_roles(&self, permission_id: Uuid) -> StoreResult<Vec<Role>> {
        let inner = self.inner.read().await;
        Ok(sorted_by_name(
            inner
                .role_permissions
                .iter()
                .filter(|(_, linked)| linked.contains(&permission_id))
                .filter_map(|(role_id, _)| inner.roles.get(role_id).cloned())
                .collect(),
            |role| role.name.as_str(),
        ))
    }

    async fn sync_permission_roles(
        &self,
        permission_id: Uuid,
        role_ids: &[Uuid],
        detach_others: bool,
    ) -> StoreResult<SyncDelta> {
        let mut inner = self.inner.write().await;
        let target: HashSet<Uuid> = role_ids.iter().copied().collect();

        let mut delta = SyncDelta::default();
        for role_id in &target {
            if inner
                .role_permissions
                .entry(*role_id)
                .or_default()
                .insert(permission_id)
            {
                delta.attached.push(*role_id);
            }
        }

        if detach_others {
            for (role_id, linked) in inner.role_permissions.iter_mut() {
                if !target.contains(role_id) && linked.remove(&permission_id) {
                    delta.detached.push(*role_id);
                }
            }
        }

        Ok(delta)
    }

    async fn attach_role(&self, user_id: Uuid, role_id: Uuid) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.user_roles.entry(user_id).or_default().insert(role_id))
    }

    async fn detach_role(&self, user_id: Uuid, role_id: Uuid) -> StoreResult<u64> {
        let mut inner = self.inner.write().await;
        let removed = inner
            .user_roles
            .get_mut(&user_id)
            .is_some_and(|assigned| assigned.remove(&role_id));
        Ok(u64::from(removed))
    }

    async fn detach_all_roles(&self, user_id: Uuid) -> StoreResult<u64> {
        let mut inner = self.inner.write().await;
        let removed = inner
            .user_roles
            .remove(&user_id)
            .map_or(0, |assigned| assigned.len());
        Ok(removed as u64)
    }

    async fn sync_user_roles(
        &self,
        user_id: Uuid,
        role_ids: &[Uuid],
        detach_others: bool,
    ) -> StoreResult<SyncDelta> {
        let mut inner = self.inner.write().await;
        Ok(sync_links(&mut inner.user_roles, user_id, role_ids, detach_others))
    }

    async fn user_roles(&self, user_id: Uuid) -> StoreResult<Vec<Role>> {
        let inner = self.inner.read().await;
        let assigned = match inner.user_roles.get(&user_id) {
            Some(assigned) => assigned,
            None => return Ok(Vec::new()),
        };

        Ok(sorted_by_name(
            assigned
                .iter()
                .filter_map(|id| inner.roles.get(id).cloned())
                .collect(),
            |role| role.name.as_str(),
        ))
    }

    async fn attach_user_permission(
        &self,
        user_id: Uuid,
        permission_id: Uuid,
    ) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .user_permissions
            .entry(user_id)
            .or_default()
            .insert(permission_id))
    }

    async fn detach_user_permission(
        &self,
        user_id: Uuid,
        permission_id: Uuid,
    ) -> StoreResult<u64> {
        let mut inner = self.inner.write().await;
        let removed = inner
            .user_permissions
            .get_mut(&user_id)
            .is_some_and(|granted| granted.remove(&permission_id));
        Ok(u64::from(removed))
    }

    async fn user_permissions(&self, user_id: Uuid) -> StoreResult<Vec<Permission>> {
        let inner = self.inner.read().await;
        let granted = match inner.user_permissions.get(&user_id) {
            Some(granted) => granted,
            None => return Ok(Vec::new()),
        };

        Ok(sorted_by_name(
            granted
                .iter()
                .filter_map(|id| inner.permissions.get(id).cloned())
                .collect(),
            |permission| permission.name.as_str(),
        ))
    }

    async fn permissions_table_exists(&self) -> StoreResult<bool> {
        Ok(self.tables_ready)
    }
}

struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// In-memory cache implementation.
///
/// Expired entries are dropped lazily on access.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use warden_store::{CacheStore, MemoryCache};
///
/// # async fn example() -> warden_store::StoreResult<()> {
/// let cache = MemoryCache::new();
/// cache.put("key", serde_json::json!(42), Duration::from_secs(60)).await?;
/// assert!(cache.has("key").await?);
/// # Ok(())
/// # }
/// ```
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache").finish()
    }
}

impl MemoryCache {
    /// Create a new empty in-memory cache.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let mut entries = self.entries.write().await;

        match entries.get(key) {
            Some(entry) if !entry.is_expired() => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: Value, ttl: Duration) -> StoreResult<()> {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        };

        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn forget(&self, key: &str) -> StoreResult<bool> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn has(&self, key: &str) -> StoreResult<bool> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).is_some_and(|entry| !entry.is_expired()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_role_name_uniqueness() {
        let store = MemoryStore::new();
        store.create_role(Role::new("admin")).await.unwrap();

        let err = store.create_role(Role::new("admin")).await.unwrap_err();
        assert!(err.is_duplicate());
    }

    #[tokio::test]
    async fn test_permission_name_uniqueness() {
        let store = MemoryStore::new();
        store
            .create_permission(Permission::new("users.create"))
            .await
            .unwrap();

        let err = store
            .create_permission(Permission::new("users.create"))
            .await
            .unwrap_err();
        assert!(err.is_duplicate());
    }

    #[tokio::test]
    async fn test_attach_is_idempotent() {
        let store = MemoryStore::new();
        let role = store.create_role(Role::new("admin")).await.unwrap();
        let perm = store
            .create_permission(Permission::new("users.create"))
            .await
            .unwrap();

        assert!(store.attach_permission(role.id, perm.id).await.unwrap());
        assert!(!store.attach_permission(role.id, perm.id).await.unwrap());
        assert_eq!(store.role_permissions(role.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_sync_replaces_and_reports_delta() {
        let store = MemoryStore::new();
        let role = store.create_role(Role::new("admin")).await.unwrap();
        let a = store.create_permission(Permission::new("a")).await.unwrap();
        let b = store.create_permission(Permission::new("b")).await.unwrap();
        let c = store.create_permission(Permission::new("c")).await.unwrap();

        let delta = store
            .sync_role_permissions(role.id, &[a.id, b.id], true)
            .await
            .unwrap();
        assert_eq!(delta.attached.len(), 2);
        assert!(delta.detached.is_empty());

        let delta = store
            .sync_role_permissions(role.id, &[b.id, c.id], true)
            .await
            .unwrap();
        assert_eq!(delta.attached, vec![c.id]);
        assert_eq!(delta.detached, vec![a.id]);

        let names: Vec<String> = store
            .role_permissions(role.id)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_sync_without_detach_is_additive() {
        let store = MemoryStore::new();
        let role = store.create_role(Role::new("admin")).await.unwrap();
        let a = store.create_permission(Permission::new("a")).await.unwrap();
        let b = store.create_permission(Permission::new("b")).await.unwrap();

        store
            .sync_role_permissions(role.id, &[a.id], true)
            .await
            .unwrap();
        let delta = store
            .sync_role_permissions(role.id, &[b.id], false)
            .await
            .unwrap();

        assert_eq!(delta.attached, vec![b.id]);
        assert!(delta.detached.is_empty());
        assert_eq!(store.role_permissions(role.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_sync_detaches_everything() {
        let store = MemoryStore::new();
        let role = store.create_role(Role::new("admin")).await.unwrap();
        let a = store.create_permission(Permission::new("a")).await.unwrap();

        store
            .sync_role_permissions(role.id, &[a.id], true)
            .await
            .unwrap();
        let delta = store
            .sync_role_permissions(role.id, &[], true)
            .await
            .unwrap();

        assert_eq!(delta.detached, vec![a.id]);
        assert!(store.role_permissions(role.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_role_removes_links() {
        let store = MemoryStore::new();
        let role = store.create_role(Role::new("admin")).await.unwrap();
        let perm = store.create_permission(Permission::new("a")).await.unwrap();
        let user_id = Uuid::now_v7();

        store.attach_permission(role.id, perm.id).await.unwrap();
        store.attach_role(user_id, role.id).await.unwrap();

        assert!(store.delete_role(role.id).await.unwrap());
        assert!(store.user_roles(user_id).await.unwrap().is_empty());
        assert!(store.permission_roles(perm.id).await.unwrap().is_empty());
        // Deleting again reports nothing removed
        assert!(!store.delete_role(role.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_permission_removes_links() {
        let store = MemoryStore::new();
        let role = store.create_role(Role::new("admin")).await.unwrap();
        let perm = store.create_permission(Permission::new("a")).await.unwrap();
        let user_id = Uuid::now_v7();

        store.attach_permission(role.id, perm.id).await.unwrap();
        store.attach_user_permission(user_id, perm.id).await.unwrap();

        assert!(store.delete_permission(perm.id).await.unwrap());
        assert!(store.role_permissions(role.id).await.unwrap().is_empty());
        assert!(store.user_permissions(user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_permission_roles_inverse_lookup() {
        let store = MemoryStore::new();
        let admin = store.create_role(Role::new("admin")).await.unwrap();
        let editor = store.create_role(Role::new("editor")).await.unwrap();
        let perm = store.create_permission(Permission::new("a")).await.unwrap();

        store.attach_permission(admin.id, perm.id).await.unwrap();
        store.attach_permission(editor.id, perm.id).await.unwrap();

        let names: Vec<String> = store
            .permission_roles(perm.id)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["admin", "editor"]);
    }

    #[tokio::test]
    async fn test_sync_permission_roles() {
        let store = MemoryStore::new();
        let admin = store.create_role(Role::new("admin")).await.unwrap();
        let editor = store.create_role(Role::new("editor")).await.unwrap();
        let perm = store.create_permission(Permission::new("a")).await.unwrap();

        store.attach_permission(admin.id, perm.id).await.unwrap();

        let delta = store
            .sync_permission_roles(perm.id, &[editor.id], true)
            .await
            .unwrap();
        assert_eq!(delta.attached, vec![editor.id]);
        assert_eq!(delta.detached, vec![admin.id]);

        let names: Vec<String> = store
            .permission_roles(perm.id)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["editor"]);
    }

    #[tokio::test]
    async fn test_table_probe() {
        assert!(MemoryStore::new().permissions_table_exists().await.unwrap());
        assert!(!MemoryStore::new()
            .without_tables()
            .permissions_table_exists()
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_cache_put_get_forget() {
        let cache = MemoryCache::new();

        assert_eq!(cache.get("k").await.unwrap(), None);
        assert!(!cache.has("k").await.unwrap());

        cache
            .put("k", serde_json::json!({"a": 1}), Duration::from_secs(60))
            .await
            .unwrap();
        assert!(cache.has("k").await.unwrap());
        assert_eq!(cache.get("k").await.unwrap(), Some(serde_json::json!({"a": 1})));

        assert!(cache.forget("k").await.unwrap());
        assert!(!cache.forget("k").await.unwrap());
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_cache_entries_expire() {
        let cache = MemoryCache::new();
        cache
            .put("k", serde_json::json!(1), Duration::from_millis(10))
            .await
            .unwrap();
        assert!(cache.has("k").await.unwrap());

        tokio::time::sleep(Duration::from_millis(25)).await;

        assert!(!cache.has("k").await.unwrap());
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_cache_put_overwrites() {
        let cache = MemoryCache::new();
        cache
            .put("k", serde_json::json!(1), Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .put("k", serde_json::json!(2), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cache.get("k").await.unwrap(), Some(serde_json::json!(2)));
    }

    #[tokio::test]
    async fn test_detach_counts() {
        let store = MemoryStore::new();
        let role = store.create_role(Role::new("admin")).await.unwrap();
        let a = store.create_permission(Permission::new("a")).await.unwrap();
        let b = store.create_permission(Permission::new("b")).await.unwrap();

        store.attach_permission(role.id, a.id).await.unwrap();
        store.attach_permission(role.id, b.id).await.unwrap();

        assert_eq!(store.detach_permission(role.id, a.id).await.unwrap(), 1);
        assert_eq!(store.detach_permission(role.id, a.id).await.unwrap(), 0);
        assert_eq!(store.detach_all_permissions(role.id).await.unwrap(), 1);
    }
}
