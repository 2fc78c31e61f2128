//! Boot-time gate registration
//!
//! At startup the application registers one named gate per permission
//! and per role, so request handlers can ask "does this user pass the
//! `users.create` gate" without knowing whether the name is a
//! permission or a role. Registration is the only consumer of the bulk
//! catalog reads on [`CatalogCache`](crate::catalog::CatalogCache).
//!
//! Registration runs before the schema may exist (first boot, pending
//! migrations), so it probes the store first; a failed probe degrades
//! to an empty registry instead of failing startup. Once the probe
//! passes, a storage failure during the catalog reads is a real fault
//! and propagates to the caller.

use std::collections::HashMap;

use uuid::Uuid;

use crate::engine::Warden;
use crate::error::RbacResult;
use warden_store::RbacStore;

/// What a named gate checks when evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateCheck {
    /// Pass if the subject holds the permission (wildcards apply)
    Permission(String),
    /// Pass if the subject holds the role
    Role(String),
}

/// Named authorization gates, built once at boot from the catalogs.
///
/// Permissions register before roles; on a name collision the first
/// definition wins, so a role sharing a permission's name never
/// shadows it.
#[derive(Debug, Default)]
pub struct GateRegistry {
    gates: HashMap<String, GateCheck>,
}

impl GateRegistry {
    /// Build the registry from the current catalogs.
    ///
    /// Probes the store first: a missing permissions table, or a storage
    /// failure during the probe, yields an empty registry so boot can
    /// proceed before migrations have run. This probe is the only place
    /// a storage error is swallowed rather than propagated; once it
    /// passes, a failing catalog read surfaces unchanged.
    pub async fn register(warden: &Warden) -> RbacResult<Self> {
        match warden.store().permissions_table_exists().await {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!("permissions table absent, registering no gates");
                return Ok(Self::default());
            }
            Err(err) => {
                tracing::warn!(error = %err, "storage probe failed, registering no gates");
                return Ok(Self::default());
            }
        }

        let permissions = warden.catalogs().permissions().await?;
        let roles = warden.catalogs().roles().await?;

        let mut gates = HashMap::new();
        for entry in permissions {
            let name = entry.permission.name;
            gates
                .entry(name.clone())
                .or_insert(GateCheck::Permission(name));
        }
        for role in roles {
            gates.entry(role.name.clone()).or_insert(GateCheck::Role(role.name));
        }

        tracing::debug!(gates = gates.len(), "authorization gates registered");
        Ok(Self { gates })
    }

    /// Whether a gate is defined under this name.
    pub fn defines(&self, ability: &str) -> bool {
        self.gates.contains_key(ability)
    }

    /// Number of registered gates.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Whether no gates are registered.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Evaluate a named gate for a user.
    ///
    /// An undefined ability is a denial, not an error. Defined gates
    /// dispatch to the live role or permission decision on the engine.
    pub async fn allows(
        &self,
        warden: &Warden,
        user_id: Uuid,
        ability: &str,
    ) -> RbacResult<bool> {
        match self.gates.get(ability) {
            None => Ok(false),
            Some(GateCheck::Permission(name)) => {
                warden.has_permission(user_id, &name.as_str().into()).await
            }
            Some(GateCheck::Role(name)) => warden.has_role(user_id, name).await,
        }
    }
}
