//! Role Registry
//!
//! Immutable role -> permission table. Built once at startup and shared
//! through [`ServerState`](crate::core::ServerState); tests can build their
//! own table with [`RoleRegistry::from_table`].

use shared::models::{Role, RolePermissions, WILDCARD_PERMISSION, default_permissions};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct RoleRegistry {
    table: HashMap<Role, Vec<String>>,
}

impl RoleRegistry {
    /// Seed the registry with the built-in role table
    pub fn default_table() -> Self {
        Self::from_table(Role::ALL.into_iter().map(|role| {
            (
                role,
                default_permissions(role)
                    .iter()
                    .map(|p| p.to_string())
                    .collect(),
            )
        }))
    }

    /// Build a registry from an explicit table
    pub fn from_table(table: impl IntoIterator<Item = (Role, Vec<String>)>) -> Self {
        Self {
            table: table.into_iter().collect(),
        }
    }

    /// Permissions of a role identifier; empty for unknown roles
    pub fn permissions_of(&self, role: &str) -> &[String] {
        Role::parse(role)
            .and_then(|r| self.table.get(&r))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Wildcard grants everything, otherwise exact membership
    pub fn has_permission(&self, role: &str, permission: &str) -> bool {
        self.permissions_of(role)
            .iter()
            .any(|p| p == WILDCARD_PERMISSION || p == permission)
    }

    /// All roles with their permissions, in declaration order
    pub fn list(&self) -> Vec<RolePermissions> {
        Role::ALL
            .into_iter()
            .map(|role| RolePermissions {
                role,
                permissions: self.permissions_of(role.as_str()).to_vec(),
            })
            .collect()
    }
}

impl Default for RoleRegistry {
    fn default() -> Self {
        Self::default_table()
    }
}
