// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles for authorization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User roles for authorization.
///
/// ## Role Hierarchy
///
/// - `Admin` - Full access to all endpoints
/// - `Lecturer` - Teaching staff
/// - `Assistant` - Teaching assistants (campus employees)
/// - `Student` - Enrolled students
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access
    Admin,
    /// Lecturer
    Lecturer,
    /// Teaching assistant
    Assistant,
    /// Student
    Student,
}

impl Role {
    /// Check if this role has at least the privileges of the required role.
    pub fn has_privilege(&self, required: Role) -> bool {
        match (self, required) {
            (Role::Admin, _) => true,
            (a, b) => *a == b,
        }
    }

    /// Parse role from string (case-insensitive).
    ///
    /// Older user records store lecturers as `lecture`.
    pub fn parse(s: &str) -> Option<Role> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "lecturer" | "lecture" => Some(Role::Lecturer),
            "assistant" => Some(Role::Assistant),
            "student" => Some(Role::Student),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Lecturer => "lecturer",
            Role::Assistant => "assistant",
            Role::Student => "student",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_has_all_privileges() {
        assert!(Role::Admin.has_privilege(Role::Admin));
        assert!(Role::Admin.has_privilege(Role::Lecturer));
        assert!(Role::Admin.has_privilege(Role::Assistant));
        assert!(Role::Admin.has_privilege(Role::Student));
    }

    #[test]
    fn student_only_has_student_privilege() {
        assert!(!Role::Student.has_privilege(Role::Admin));
        assert!(!Role::Student.has_privilege(Role::Lecturer));
        assert!(Role::Student.has_privilege(Role::Student));
    }

    #[test]
    fn parse_accepts_legacy_lecture_tag() {
        assert_eq!(Role::parse("lecture"), Some(Role::Lecturer));
        assert_eq!(Role::parse("Lecturer"), Some(Role::Lecturer));
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("dean"), None);
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Role::Assistant).unwrap();
        assert_eq!(json, r#""assistant""#);
    }
}
