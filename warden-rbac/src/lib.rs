//! # Warden RBAC
//!
//! The authorization decision engine for the Warden platform: resolves
//! role and permission references, manages grants through a storage
//! backend, memoizes the role/permission catalogs behind a TTL'd cache,
//! and answers the `has_role` / `has_permission` questions request
//! handlers ask.
//!
//! ## Overview
//!
//! The warden-rbac crate handles:
//! - **Resolution**: Role/permission refs (ID, name, or entity) to records
//! - **Associations**: Grant, revoke, and sync of role/permission links
//! - **Catalog cache**: TTL'd memoization of the full catalogs
//! - **Decisions**: Role and wildcard-aware permission checks
//! - **Gates**: Boot-time registration of named authorization checks
//! - **Guards**: Framework-free middleware building blocks
//!
//! ## Architecture
//!
//! ```text
//!              ┌─ CatalogCache ── CacheStore (TTL'd catalogs)
//!   Warden ────┤
//!              └─ RbacStore (records + link tables)
//!
//!   GateRegistry ── reads catalogs once at boot
//!   Role/Permission guards ── per-request checks via Warden
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use uuid::Uuid;
//! use warden_rbac::{RbacConfig, Warden};
//! use warden_store::{MemoryCache, MemoryStore};
//!
//! # async fn example() -> warden_rbac::RbacResult<()> {
//! let warden = Warden::new(
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(MemoryCache::new()),
//!     RbacConfig::default(),
//! );
//!
//! let role = warden.create_role("admin", Some("Administrator")).await?;
//! warden.create_permission("users.*", None).await?;
//! warden.give_permission_to(&role.name.as_str().into(), &"users.*".into()).await?;
//!
//! let user_id = Uuid::now_v7();
//! warden.assign_role(user_id, &"admin".into()).await?;
//! assert!(warden.has_permission(user_id, &"users.create".into()).await?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Decision model
//!
//! Decisions are allow-list only: any single matching grant (exact or
//! wildcard) suffices and there is no explicit-deny override. Per-request
//! decisions always read the subject's live associations; the cached
//! catalogs serve only the boot-time gate registration bulk read.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod gate;
pub mod guard;
pub mod refs;
pub mod resolver;

// Re-export main types for convenience
pub use catalog::{CatalogCache, PermissionWithRoles};
pub use config::RbacConfig;
pub use engine::Warden;
pub use error::{RbacError, RbacResult};
pub use gate::{GateCheck, GateRegistry};
pub use guard::{PermissionGuard, RoleGuard, RoleOrPermissionGuard};
pub use refs::{PermissionRef, RoleRef};
