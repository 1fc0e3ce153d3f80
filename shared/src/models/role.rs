//! Role Model
//!
//! 角色是封闭集合 (admin / teacher / student / parent)，
//! 权限字符串按角色静态定义，`*` 表示全部权限。

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wildcard permission, grants every permission check
pub const WILDCARD_PERMISSION: &str = "*";

/// Coarse-grained identity category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
    Parent,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Teacher, Role::Student, Role::Parent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
            Role::Parent => "parent",
        }
    }

    /// Exact, case-sensitive lookup; unknown identifiers yield `None`
    pub fn parse(value: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|r| r.as_str() == value)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// === Permission tokens ===

pub const CREATE_RESULT: &str = "create_result";
pub const UPDATE_RESULT: &str = "update_result";
pub const READ_RESULT: &str = "read_result";
pub const READ_OWN_RESULT: &str = "read_own_result";
pub const READ_CHILD_RESULT: &str = "read_child_result";
pub const MANAGE_ATTENDANCE: &str = "manage_attendance";
pub const MANAGE_APPOINTMENTS: &str = "manage_appointments";
pub const BOOK_APPOINTMENT: &str = "book_appointment";
pub const VIEW_TIMETABLE: &str = "view_timetable";
pub const VIEW_ANALYTICS: &str = "view_analytics";

/// 管理员：全部权限
pub const DEFAULT_ADMIN_PERMISSIONS: &[&str] = &[WILDCARD_PERMISSION];

pub const DEFAULT_TEACHER_PERMISSIONS: &[&str] = &[
    CREATE_RESULT,
    UPDATE_RESULT,
    READ_RESULT,
    MANAGE_ATTENDANCE,
    MANAGE_APPOINTMENTS,
    VIEW_TIMETABLE,
    VIEW_ANALYTICS,
];

pub const DEFAULT_STUDENT_PERMISSIONS: &[&str] =
    &[READ_OWN_RESULT, BOOK_APPOINTMENT, VIEW_TIMETABLE];

pub const DEFAULT_PARENT_PERMISSIONS: &[&str] =
    &[READ_CHILD_RESULT, BOOK_APPOINTMENT, VIEW_TIMETABLE];

/// Default permission list for a role
pub fn default_permissions(role: Role) -> &'static [&'static str] {
    match role {
        Role::Admin => DEFAULT_ADMIN_PERMISSIONS,
        Role::Teacher => DEFAULT_TEACHER_PERMISSIONS,
        Role::Student => DEFAULT_STUDENT_PERMISSIONS,
        Role::Parent => DEFAULT_PARENT_PERMISSIONS,
    }
}

/// Role with its resolved permission list (API output)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolePermissions {
    pub role: Role,
    pub permissions: Vec<String>,
}
