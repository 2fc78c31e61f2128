//! # Warden Store
//!
//! Collaborator contracts for the Warden authorization layer: the
//! relational storage interface the engine persists through, the cache
//! interface the catalog coordinator memoizes through, and in-memory
//! reference implementations of both.
//!
//! ## Overview
//!
//! The warden-store crate handles:
//! - **RbacStore**: Role/permission records and their link tables
//! - **CacheStore**: TTL'd key-value storage for the catalog cache
//! - **MemoryStore / MemoryCache**: Process-local reference backends
//!
//! ## Architecture
//!
//! ```text
//! roles ──┬── role_permission ──┬── permissions
//!         │                     │
//! role_user                user_permission (direct grants)
//!         │                     │
//!         └──────── users ──────┘
//! ```
//!
//! Users are external to the system; the store only tracks their side
//! of the link tables, keyed by user ID.
//!
//! ## Backends
//!
//! The in-memory implementations are suitable for single-process
//! applications and testing. Production deployments implement
//! [`RbacStore`] and [`CacheStore`] over their relational database and
//! shared cache of choice.

pub mod cache;
pub mod error;
#[cfg(feature = "memory")]
pub mod memory;
pub mod store;

// Re-export main types for convenience
pub use cache::CacheStore;
pub use error::{StoreError, StoreResult};
#[cfg(feature = "memory")]
pub use memory::{MemoryCache, MemoryStore};
pub use store::{RbacStore, SyncDelta};
