//! Role and permission references
//!
//! Callers address roles and permissions by ID, by name, or with an
//! already-resolved record. The `From` impls let engine call sites pass
//! `"admin".into()` or a `Role` interchangeably.

use uuid::Uuid;
use warden_core::{Permission, Role};

/// A reference to a role: ID, exact name, or resolved record.
#[derive(Debug, Clone)]
pub enum RoleRef {
    /// Address by record ID
    Id(Uuid),
    /// Address by exact, case-sensitive name
    Name(String),
    /// Already resolved; resolution passes it through unchanged
    Role(Role),
}

impl From<Uuid> for RoleRef {
    fn from(id: Uuid) -> Self {
        RoleRef::Id(id)
    }
}

impl From<&str> for RoleRef {
    fn from(name: &str) -> Self {
        RoleRef::Name(name.to_string())
    }
}

impl From<String> for RoleRef {
    fn from(name: String) -> Self {
        RoleRef::Name(name)
    }
}

impl From<Role> for RoleRef {
    fn from(role: Role) -> Self {
        RoleRef::Role(role)
    }
}

impl From<&Role> for RoleRef {
    fn from(role: &Role) -> Self {
        RoleRef::Role(role.clone())
    }
}

/// A reference to a permission: ID, exact name, or resolved record.
#[derive(Debug, Clone)]
pub enum PermissionRef {
    /// Address by record ID
    Id(Uuid),
    /// Address by exact, case-sensitive name
    Name(String),
    /// Already resolved; resolution passes it through unchanged
    Permission(Permission),
}

impl From<Uuid> for PermissionRef {
    fn from(id: Uuid) -> Self {
        PermissionRef::Id(id)
    }
}

impl From<&str> for PermissionRef {
    fn from(name: &str) -> Self {
        PermissionRef::Name(name.to_string())
    }
}

impl From<String> for PermissionRef {
    fn from(name: String) -> Self {
        PermissionRef::Name(name)
    }
}

impl From<Permission> for PermissionRef {
    fn from(permission: Permission) -> Self {
        PermissionRef::Permission(permission)
    }
}

impl From<&Permission> for PermissionRef {
    fn from(permission: &Permission) -> Self {
        PermissionRef::Permission(permission.clone())
    }
}

impl PermissionRef {
    /// The name this reference carries, if it carries one.
    pub fn name(&self) -> Option<&str> {
        match self {
            PermissionRef::Name(name) => Some(name),
            PermissionRef::Permission(permission) => Some(&permission.name),
            PermissionRef::Id(_) => None,
        }
    }
}

impl RoleRef {
    /// The name this reference carries, if it carries one.
    pub fn name(&self) -> Option<&str> {
        match self {
            RoleRef::Name(name) => Some(name),
            RoleRef::Role(role) => Some(&role.name),
            RoleRef::Id(_) => None,
        }
    }
}
