//! Console roles and the views each one may open.
//!
//! Signing in is a simulation: a session records which role is active and,
//! for scoped roles, the branch or student it is limited to.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::SchoolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum View {
    Overview,
    Schools,
    Branches,
    Staff,
    Students,
    Admissions,
    Scores,
    Reports,
    FeeStructures,
    Payments,
    Ledger,
    Store,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    SuperAdmin,
    BranchAdmin,
    Teacher,
    StudentParent,
    Bursar,
    Librarian,
    Receptionist,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::SuperAdmin,
        Role::BranchAdmin,
        Role::Teacher,
        Role::StudentParent,
        Role::Bursar,
        Role::Librarian,
        Role::Receptionist,
    ];

    pub fn views(self) -> &'static [View] {
        use View::*;
        match self {
            Role::SuperAdmin => &[
                Overview,
                Schools,
                Branches,
                Staff,
                Students,
                Admissions,
                Scores,
                Reports,
                FeeStructures,
                Payments,
                Ledger,
                Store,
            ],
            Role::BranchAdmin => &[
                Overview,
                Branches,
                Staff,
                Students,
                Admissions,
                Reports,
                FeeStructures,
                Payments,
                Ledger,
                Store,
            ],
            Role::Teacher => &[Overview, Students, Scores, Reports],
            Role::StudentParent => &[Overview, Reports, Ledger],
            Role::Bursar => &[Overview, Students, FeeStructures, Payments, Ledger],
            Role::Librarian => &[Overview, Students],
            Role::Receptionist => &[Overview, Students, Admissions],
        }
    }

    pub fn permits(self, view: View) -> bool {
        self.views().contains(&view)
    }

    /// Roles whose data is limited to a single branch when one is given.
    pub fn is_branch_scoped(self) -> bool {
        !matches!(self, Role::SuperAdmin | Role::StudentParent)
    }

    pub fn slug(self) -> &'static str {
        match self {
            Role::SuperAdmin => "super-admin",
            Role::BranchAdmin => "branch-admin",
            Role::Teacher => "teacher",
            Role::StudentParent => "student",
            Role::Bursar => "bursar",
            Role::Librarian => "librarian",
            Role::Receptionist => "receptionist",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Role::SuperAdmin => "Super Admin",
            Role::BranchAdmin => "Branch Admin",
            Role::Teacher => "Teacher",
            Role::StudentParent => "Student / Parent",
            Role::Bursar => "Bursar",
            Role::Librarian => "Librarian",
            Role::Receptionist => "Receptionist",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Role {
    type Err = SchoolError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "super-admin" | "superadmin" | "platform" => Ok(Role::SuperAdmin),
            "branch-admin" | "admin" | "school-admin" => Ok(Role::BranchAdmin),
            "teacher" => Ok(Role::Teacher),
            "student" | "parent" | "student-parent" => Ok(Role::StudentParent),
            "bursar" => Ok(Role::Bursar),
            "librarian" => Ok(Role::Librarian),
            "receptionist" => Ok(Role::Receptionist),
            _ => Err(SchoolError::InvalidInput(format!(
                "unknown role `{}` (expected one of: {})",
                value.trim(),
                Role::ALL
                    .iter()
                    .map(|role| role.slug())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }
}

/// The simulated sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub role: Role,
    pub branch_id: Option<String>,
    pub student_id: Option<String>,
}

impl Session {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            branch_id: None,
            student_id: None,
        }
    }

    pub fn for_branch(role: Role, branch_id: impl Into<String>) -> Self {
        Self {
            role,
            branch_id: Some(branch_id.into()),
            student_id: None,
        }
    }

    pub fn for_student(student_id: impl Into<String>, branch_id: impl Into<String>) -> Self {
        Self {
            role: Role::StudentParent,
            branch_id: Some(branch_id.into()),
            student_id: Some(student_id.into()),
        }
    }

    pub fn permits(&self, view: View) -> bool {
        self.role.permits(view)
    }

    /// Branch filter to apply to listings, if the session is scoped.
    pub fn branch_scope(&self) -> Option<&str> {
        self.branch_id.as_deref()
    }

    /// Whether the session may see data for the given branch.
    pub fn can_see_branch(&self, branch_id: &str) -> bool {
        self.branch_scope().map_or(true, |scope| scope == branch_id)
    }

    /// Whether the session may see data belonging to the given student.
    pub fn can_see_student(&self, student_id: &str, branch_id: &str) -> bool {
        match &self.student_id {
            Some(own) => own == student_id,
            None => self.can_see_branch(branch_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn super_admin_sees_every_view() {
        for role in Role::ALL {
            for view in role.views() {
                assert!(Role::SuperAdmin.permits(*view));
            }
        }
    }

    #[test]
    fn teachers_author_scores_but_not_fees() {
        assert!(Role::Teacher.permits(View::Scores));
        assert!(!Role::Teacher.permits(View::Payments));
        assert!(!Role::Bursar.permits(View::Scores));
        assert!(Role::Bursar.permits(View::Payments));
    }

    #[test]
    fn every_role_has_an_overview() {
        assert!(Role::ALL.iter().all(|role| role.permits(View::Overview)));
    }

    #[test]
    fn roles_parse_from_slugs_and_aliases() {
        for role in Role::ALL {
            assert_eq!(role.slug().parse::<Role>().unwrap(), role);
        }
        assert_eq!("Parent".parse::<Role>().unwrap(), Role::StudentParent);
        assert!("janitor".parse::<Role>().is_err());
    }

    #[test]
    fn student_sessions_only_see_themselves() {
        let session = Session::for_student("STU-0001", "BR-0001");
        assert!(session.can_see_student("STU-0001", "BR-0001"));
        assert!(!session.can_see_student("STU-0002", "BR-0001"));
    }

    #[test]
    fn branch_scope_limits_visibility() {
        let scoped = Session::for_branch(Role::Bursar, "BR-0002");
        assert!(scoped.can_see_branch("BR-0002"));
        assert!(!scoped.can_see_branch("BR-0001"));
        assert!(Session::new(Role::SuperAdmin).can_see_branch("BR-0001"));
    }
}
