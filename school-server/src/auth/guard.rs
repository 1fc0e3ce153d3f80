//! Access Guard
//!
//! Role allow-list check. The decision is pure and synchronous: it reads the
//! request-scoped [`CurrentUser`] and an allow-list fixed at construction.

use std::collections::BTreeSet;
use std::sync::Arc;

use shared::models::Role;

use crate::auth::CurrentUser;

/// Guard decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied,
}

/// Role allow-list
///
/// A single role is passed as a one-element set: `RoleGuard::new([Role::Admin])`.
#[derive(Debug, Clone)]
pub struct RoleGuard {
    allowed: Arc<BTreeSet<Role>>,
}

impl RoleGuard {
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed: Arc::new(roles.into_iter().collect()),
        }
    }

    pub fn allowed_roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.allowed.iter().copied()
    }

    /// Exact string comparison of the identity role against the allow-list
    ///
    /// No identity means denied, whatever the allow-list holds.
    pub fn check(&self, identity: Option<&CurrentUser>) -> Access {
        match identity {
            Some(user) if self.allowed.iter().any(|r| r.as_str() == user.role) => Access::Allowed,
            _ => Access::Denied,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str) -> CurrentUser {
        CurrentUser::new("u-1", "someone", role)
    }

    #[test]
    fn test_members_are_allowed() {
        let guard = RoleGuard::new([Role::Teacher, Role::Admin]);
        assert_eq!(guard.check(Some(&user("teacher"))), Access::Allowed);
        assert_eq!(guard.check(Some(&user("admin"))), Access::Allowed);
    }

    #[test]
    fn test_non_members_are_denied() {
        let guard = RoleGuard::new([Role::Teacher, Role::Admin]);
        for role in ["student", "parent", "Teacher", "", "*", "unknown_role"] {
            assert_eq!(guard.check(Some(&user(role))), Access::Denied, "role {role:?}");
        }
    }

    #[test]
    fn test_missing_identity_is_always_denied() {
        assert_eq!(RoleGuard::new(Vec::<Role>::new()).check(None), Access::Denied);
        assert_eq!(RoleGuard::new(Role::ALL).check(None), Access::Denied);
    }

    #[test]
    fn test_empty_allow_list_denies_everyone() {
        let guard = RoleGuard::new(Vec::<Role>::new());
        for role in Role::ALL {
            assert_eq!(guard.check(Some(&user(role.as_str()))), Access::Denied);
        }
    }

    #[test]
    fn test_single_role_equals_one_element_set() {
        let single = RoleGuard::new([Role::Admin]);
        let set = RoleGuard::new(vec![Role::Admin, Role::Admin]);

        assert_eq!(
            single.allowed_roles().collect::<Vec<_>>(),
            set.allowed_roles().collect::<Vec<_>>()
        );
        for role in ["admin", "teacher", "student", "parent"] {
            assert_eq!(single.check(Some(&user(role))), set.check(Some(&user(role))));
        }
    }
}
