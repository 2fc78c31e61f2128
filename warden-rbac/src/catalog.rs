//! Catalog cache coordinator
//!
//! Memoizes the full permission and role catalogs behind the cache
//! collaborator, each under a well-known key with its own TTL. Any
//! role/permission/association mutation clears both catalogs at once:
//! grants reference roles and vice versa, so invalidation is coarse by
//! design.
//!
//! Cache read failures degrade to a miss (the catalog is read straight
//! from storage); they never surface as a denial. Invalidation failures
//! do surface, because a mutation must not return while stale catalogs
//! could still be served.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::RbacConfig;
use crate::error::RbacResult;
use warden_core::{Permission, Role};
use warden_store::{CacheStore, RbacStore};

/// Cache key for the permission catalog.
pub const PERMISSIONS_CACHE_KEY: &str = "warden_permissions";

/// Cache key for the role catalog.
pub const ROLES_CACHE_KEY: &str = "warden_roles";

/// A permission with its linked roles eagerly loaded, as stored in the
/// permission catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PermissionWithRoles {
    /// The permission record
    pub permission: Permission,
    /// Roles the permission is linked to
    pub roles: Vec<Role>,
}

/// Coordinator for the two TTL'd catalog caches.
///
/// Constructed once at startup and shared by reference; the engine
/// routes every mutation through [`invalidate`](CatalogCache::invalidate).
pub struct CatalogCache {
    store: Arc<dyn RbacStore>,
    cache: Arc<dyn CacheStore>,
    config: RbacConfig,
}

impl std::fmt::Debug for CatalogCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogCache")
            .field("config", &self.config)
            .finish()
    }
}

impl CatalogCache {
    /// Create a new catalog cache over the given collaborators.
    pub fn new(store: Arc<dyn RbacStore>, cache: Arc<dyn CacheStore>, config: RbacConfig) -> Self {
        Self {
            store,
            cache,
            config,
        }
    }

    /// Read the permission catalog, with roles eagerly loaded.
    ///
    /// Served from the cache while a live entry exists; otherwise read
    /// from storage and cached with the permissions TTL. With caching
    /// disabled this is always a direct storage read.
    pub async fn permissions(&self) -> RbacResult<Vec<PermissionWithRoles>> {
        self.remember(
            PERMISSIONS_CACHE_KEY,
            self.config.permissions_ttl,
            self.load_permissions(),
        )
        .await
    }

    /// Read the role catalog.
    pub async fn roles(&self) -> RbacResult<Vec<Role>> {
        let store = Arc::clone(&self.store);
        self.remember(ROLES_CACHE_KEY, self.config.roles_ttl, async move {
            Ok(store.all_roles().await?)
        })
        .await
    }

    /// Clear both catalogs.
    ///
    /// Coarse-grained on purpose: a permission or role mutation
    /// invalidates the whole cache rather than a single entry.
    pub async fn invalidate(&self) -> RbacResult<()> {
        if !self.config.cache_enabled {
            return Ok(());
        }

        self.cache.forget(PERMISSIONS_CACHE_KEY).await?;
        self.cache.forget(ROLES_CACHE_KEY).await?;
        tracing::debug!("catalog cache invalidated");

        Ok(())
    }

    async fn load_permissions(&self) -> RbacResult<Vec<PermissionWithRoles>> {
        let permissions = self.store.all_permissions().await?;

        let mut catalog = Vec::with_capacity(permissions.len());
        for permission in permissions {
            let roles = self.store.permission_roles(permission.id).await?;
            catalog.push(PermissionWithRoles { permission, roles });
        }

        Ok(catalog)
    }

    /// Serve `key` from the cache, falling back to `load` on a miss and
    /// caching the loaded value. Cache failures are logged and treated
    /// as misses.
    async fn remember<T>(
        &self,
        key: &str,
        ttl: Duration,
        load: impl std::future::Future<Output = RbacResult<T>>,
    ) -> RbacResult<T>
    where
        T: Serialize + serde::de::DeserializeOwned,
    {
        if !self.config.cache_enabled {
            return load.await;
        }

        match self.cache.get(key).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(parsed) => {
                    tracing::debug!(key, "catalog served from cache");
                    return Ok(parsed);
                }
                Err(err) => {
                    tracing::warn!(key, error = %err, "cached catalog unreadable, reloading");
                }
            },
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(key, error = %err, "cache read failed, falling back to storage");
            }
        }

        let value = load.await?;

        match serde_json::to_value(&value) {
            Ok(json) => {
                if let Err(err) = self.cache.put(key, json, ttl).await {
                    tracing::warn!(key, error = %err, "failed to cache catalog");
                }
            }
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to serialize catalog for caching");
            }
        }

        Ok(value)
    }
}
