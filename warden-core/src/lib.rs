//! # Warden Core
//!
//! Core domain types and matching algorithms for the Warden
//! authorization layer: roles, hierarchical wildcard permissions, and
//! the grant-decision functions shared by every storage backend.
//!
//! ## Overview
//!
//! The warden-core crate handles:
//! - **Roles**: Named permission collections assignable to users
//! - **Permissions**: Named capabilities, optionally wildcard prefix grants
//! - **Actions**: The verb vocabulary permissions are built from
//! - **Matching**: Exact and wildcard grant decisions over name sets
//!
//! ## Architecture
//!
//! ```text
//! Permission name = dot-delimited path [+ trailing wildcard]
//!
//! Examples:
//!   "users.create"   - Create users
//!   "users.*"        - Every permission under the users group
//!   "*"              - Every permission
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use std::collections::HashSet;
//! use warden_core::{matcher, Permission, Role};
//!
//! // Create a role and a wildcard permission
//! let role = Role::new("admin").with_label("Administrator");
//! let perm = Permission::new("users.*");
//! assert!(perm.is_wildcard());
//! assert_eq!(perm.group(), "users");
//!
//! // Decide a grant against a subject's effective permission names
//! let granted: HashSet<String> = ["users.*".to_string()].into_iter().collect();
//! assert!(matcher::is_granted("users.create", &granted, true));
//! assert!(!matcher::is_granted("posts.create", &granted, true));
//! ```
//!
//! ## Integration with warden-rbac
//!
//! This crate is storage-agnostic. The `warden-rbac` engine resolves a
//! subject's effective permission set from a `warden-store` backend and
//! feeds it to the [`matcher`] functions defined here.

pub mod action;
pub mod matcher;
pub mod permission;
pub mod role;

// Re-export main types for convenience
pub use action::Action;
pub use permission::Permission;
pub use role::Role;
