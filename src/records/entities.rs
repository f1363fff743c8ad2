use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::SchoolError;
use crate::grading::{evaluate, EvaluatedScore, ScoreComponents};

/// A school tenant on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub id: String,
    pub school_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    BranchAdmin,
    Teacher,
    Bursar,
    Librarian,
    Receptionist,
}

impl StaffRole {
    pub const ALL: [StaffRole; 5] = [
        StaffRole::BranchAdmin,
        StaffRole::Teacher,
        StaffRole::Bursar,
        StaffRole::Librarian,
        StaffRole::Receptionist,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StaffRole::BranchAdmin => "Branch Admin",
            StaffRole::Teacher => "Teacher",
            StaffRole::Bursar => "Bursar",
            StaffRole::Librarian => "Librarian",
            StaffRole::Receptionist => "Receptionist",
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StaffRole {
    type Err = SchoolError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "branch-admin" | "admin" => Ok(StaffRole::BranchAdmin),
            "teacher" => Ok(StaffRole::Teacher),
            "bursar" => Ok(StaffRole::Bursar),
            "librarian" => Ok(StaffRole::Librarian),
            "receptionist" => Ok(StaffRole::Receptionist),
            _ => Err(SchoolError::InvalidInput(format!(
                "unknown staff role `{}`",
                value.trim()
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub id: String,
    pub branch_id: String,
    pub name: String,
    pub role: StaffRole,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subjects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub class_id: String,
    pub branch_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guardian: Option<String>,
    pub enrolled_on: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    First,
    Second,
    Third,
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Term::First => "First Term",
            Term::Second => "Second Term",
            Term::Third => "Third Term",
        };
        f.write_str(label)
    }
}

impl FromStr for Term {
    type Err = SchoolError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "first" | "1st" => Ok(Term::First),
            "2" | "second" | "2nd" => Ok(Term::Second),
            "3" | "third" | "3rd" => Ok(Term::Third),
            other => Err(SchoolError::InvalidInput(format!(
                "unknown term `{}` (expected 1, 2 or 3)",
                other
            ))),
        }
    }
}

/// Authored marks for one (student, subject, term). Grades are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub student_id: String,
    pub subject: String,
    pub term: Term,
    pub components: ScoreComponents,
    pub updated_at: DateTime<Utc>,
}

impl ScoreRecord {
    pub fn new(
        student_id: impl Into<String>,
        subject: impl Into<String>,
        term: Term,
        components: ScoreComponents,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            subject: subject.into(),
            term,
            components,
            updated_at: Utc::now(),
        }
    }

    pub fn evaluated(&self) -> EvaluatedScore {
        evaluate(self.components)
    }

    pub fn matches(&self, student_id: &str, subject: &str, term: Term) -> bool {
        self.term == term
            && self.student_id == student_id
            && self.subject.eq_ignore_ascii_case(subject)
    }
}
