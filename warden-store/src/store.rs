//! Storage contract
//!
//! The relational interface the authorization engine persists through:
//! unique-constrained role/permission records plus the three link tables
//! (role↔permission, user↔role, user↔permission direct grants).
//!
//! Attach operations are idempotent: existence of a link is the grant,
//! and attaching an existing link is a no-op rather than an error or a
//! duplicate row.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreResult;
use warden_core::{Permission, Role};

/// The delta produced by a sync (full set replacement) operation.
///
/// # Example
///
/// ```
/// use warden_store::SyncDelta;
///
/// let delta = SyncDelta::default();
/// assert!(delta.is_noop());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncDelta {
    /// IDs newly linked by the sync
    pub attached: Vec<Uuid>,
    /// IDs unlinked by the sync
    pub detached: Vec<Uuid>,
}

impl SyncDelta {
    /// Check whether the sync changed anything.
    pub fn is_noop(&self) -> bool {
        self.attached.is_empty() && self.detached.is_empty()
    }
}

/// Relational storage for roles, permissions, and their associations.
///
/// Implementations must enforce global name uniqueness on roles and
/// permissions, and must treat link rows as pure pairs with no identity
/// of their own.
#[async_trait]
pub trait RbacStore: Send + Sync {
    // -- Role records --------------------------------------------------

    /// Persist a new role. Fails with [`StoreError::DuplicateName`] if
    /// the name is taken.
    ///
    /// [`StoreError::DuplicateName`]: crate::StoreError::DuplicateName
    async fn create_role(&self, role: Role) -> StoreResult<Role>;

    /// Find a role by ID.
    async fn find_role(&self, id: Uuid) -> StoreResult<Option<Role>>;

    /// Find a role by exact, case-sensitive name.
    async fn find_role_by_name(&self, name: &str) -> StoreResult<Option<Role>>;

    /// Delete a role and its links. Returns whether a record existed.
    async fn delete_role(&self, id: Uuid) -> StoreResult<bool>;

    /// Read the full role catalog.
    async fn all_roles(&self) -> StoreResult<Vec<Role>>;

    // -- Permission records --------------------------------------------

    /// Persist a new permission. Fails with [`StoreError::DuplicateName`]
    /// if the name is taken.
    ///
    /// [`StoreError::DuplicateName`]: crate::StoreError::DuplicateName
    async fn create_permission(&self, permission: Permission) -> StoreResult<Permission>;

    /// Find a permission by ID.
    async fn find_permission(&self, id: Uuid) -> StoreResult<Option<Permission>>;

    /// Find a permission by exact, case-sensitive name.
    async fn find_permission_by_name(&self, name: &str) -> StoreResult<Option<Permission>>;

    /// Delete a permission and its links. Returns whether a record existed.
    async fn delete_permission(&self, id: Uuid) -> StoreResult<bool>;

    /// Read the full permission catalog.
    async fn all_permissions(&self) -> StoreResult<Vec<Permission>>;

    // -- Role ↔ permission links ---------------------------------------

    /// Idempotently link a permission to a role. Returns whether the
    /// link was newly created.
    async fn attach_permission(&self, role_id: Uuid, permission_id: Uuid) -> StoreResult<bool>;

    /// Unlink a permission from a role. Returns the number of links
    /// removed (0 or 1).
    async fn detach_permission(&self, role_id: Uuid, permission_id: Uuid) -> StoreResult<u64>;

    /// Unlink every permission from a role. Returns the number removed.
    async fn detach_all_permissions(&self, role_id: Uuid) -> StoreResult<u64>;

    /// Replace a role's permission set with exactly the given IDs.
    ///
    /// With `detach_others` false the sync is additive only. Returns the
    /// delta of newly attached and detached IDs.
    async fn sync_role_permissions(
        &self,
        role_id: Uuid,
        permission_ids: &[Uuid],
        detach_others: bool,
    ) -> StoreResult<SyncDelta>;

    /// Check whether a specific role→permission link exists.
    async fn has_permission_link(&self, role_id: Uuid, permission_id: Uuid) -> StoreResult<bool>;

    /// Eager-load the permissions linked to a role.
    async fn role_permissions(&self, role_id: Uuid) -> StoreResult<Vec<Permission>>;

    /// Eager-load the roles a permission is linked to.
    async fn permission_roles(&self, permission_id: Uuid) -> StoreResult<Vec<Role>>;

    /// Replace a permission's role set with exactly the given IDs.
    ///
    /// The inverse of [`sync_role_permissions`], over the same link
    /// table.
    ///
    /// [`sync_role_permissions`]: RbacStore::sync_role_permissions
    async fn sync_permission_roles(
        &self,
        permission_id: Uuid,
        role_ids: &[Uuid],
        detach_others: bool,
    ) -> StoreResult<SyncDelta>;

    // -- User ↔ role links ---------------------------------------------

    /// Idempotently assign a role to a user. Returns whether the link
    /// was newly created.
    async fn attach_role(&self, user_id: Uuid, role_id: Uuid) -> StoreResult<bool>;

    /// Unassign a role from a user. Returns the number of links removed.
    async fn detach_role(&self, user_id: Uuid, role_id: Uuid) -> StoreResult<u64>;

    /// Unassign every role from a user. Returns the number removed.
    async fn detach_all_roles(&self, user_id: Uuid) -> StoreResult<u64>;

    /// Replace a user's role set with exactly the given IDs.
    ///
    /// With `detach_others` false the sync is additive only.
    async fn sync_user_roles(
        &self,
        user_id: Uuid,
        role_ids: &[Uuid],
        detach_others: bool,
    ) -> StoreResult<SyncDelta>;

    /// Eager-load the roles assigned to a user.
    async fn user_roles(&self, user_id: Uuid) -> StoreResult<Vec<Role>>;

    // -- User ↔ permission direct grants -------------------------------

    /// Idempotently grant a permission directly to a user, bypassing
    /// roles. Returns whether the link was newly created.
    async fn attach_user_permission(&self, user_id: Uuid, permission_id: Uuid)
        -> StoreResult<bool>;

    /// Revoke a direct permission grant. Returns the number removed.
    async fn detach_user_permission(&self, user_id: Uuid, permission_id: Uuid)
        -> StoreResult<u64>;

    /// Eager-load a user's direct permission grants.
    async fn user_permissions(&self, user_id: Uuid) -> StoreResult<Vec<Permission>>;

    // -- Bootstrap -----------------------------------------------------

    /// Probe whether the permissions table exists yet.
    ///
    /// Used at boot before gate registration; callers treat a storage
    /// failure here as "table absent" rather than fatal.
    async fn permissions_table_exists(&self) -> StoreResult<bool>;
}
