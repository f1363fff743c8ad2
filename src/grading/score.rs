use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::table::{band_for, is_promotion_eligible, GradeBand, GRADING_TABLE, MAX_TOTAL};
use crate::errors::SchoolError;

/// One of the four assessed parts of a subject score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreField {
    Test1,
    Test2,
    Assignment,
    Exam,
}

impl ScoreField {
    pub const ALL: [ScoreField; 4] = [
        ScoreField::Test1,
        ScoreField::Test2,
        ScoreField::Assignment,
        ScoreField::Exam,
    ];

    /// Highest mark the field accepts.
    pub fn cap(self) -> u32 {
        match self {
            ScoreField::Test1 | ScoreField::Test2 => 10,
            ScoreField::Assignment => 20,
            ScoreField::Exam => 60,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreField::Test1 => "test1",
            ScoreField::Test2 => "test2",
            ScoreField::Assignment => "assignment",
            ScoreField::Exam => "exam",
        }
    }

    /// Saturates a raw entry into `0..=cap`.
    pub fn clamp(self, raw: i64) -> u32 {
        raw.clamp(0, i64::from(self.cap())) as u32
    }
}

impl fmt::Display for ScoreField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ScoreField {
    type Err = SchoolError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "test1" | "t1" | "ca1" => Ok(ScoreField::Test1),
            "test2" | "t2" | "ca2" => Ok(ScoreField::Test2),
            "assignment" | "assign" | "a" => Ok(ScoreField::Assignment),
            "exam" | "e" => Ok(ScoreField::Exam),
            other => Err(SchoolError::InvalidInput(format!(
                "unknown score field `{}` (expected test1, test2, assignment or exam)",
                other
            ))),
        }
    }
}

/// Raw marks for one subject; every field is already clamped to its cap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawComponents")]
pub struct ScoreComponents {
    test1: u32,
    test2: u32,
    assignment: u32,
    exam: u32,
}

#[derive(Deserialize)]
struct RawComponents {
    #[serde(default)]
    test1: i64,
    #[serde(default)]
    test2: i64,
    #[serde(default)]
    assignment: i64,
    #[serde(default)]
    exam: i64,
}

impl From<RawComponents> for ScoreComponents {
    fn from(raw: RawComponents) -> Self {
        ScoreComponents::clamped(raw.test1, raw.test2, raw.assignment, raw.exam)
    }
}

impl ScoreComponents {
    /// Builds components from raw entries, saturating each into its range.
    pub fn clamped(test1: i64, test2: i64, assignment: i64, exam: i64) -> Self {
        Self {
            test1: ScoreField::Test1.clamp(test1),
            test2: ScoreField::Test2.clamp(test2),
            assignment: ScoreField::Assignment.clamp(assignment),
            exam: ScoreField::Exam.clamp(exam),
        }
    }

    pub fn get(&self, field: ScoreField) -> u32 {
        match field {
            ScoreField::Test1 => self.test1,
            ScoreField::Test2 => self.test2,
            ScoreField::Assignment => self.assignment,
            ScoreField::Exam => self.exam,
        }
    }

    /// Replaces a single field, clamping the new value.
    pub fn set(&mut self, field: ScoreField, raw: i64) {
        let value = field.clamp(raw);
        match field {
            ScoreField::Test1 => self.test1 = value,
            ScoreField::Test2 => self.test2 = value,
            ScoreField::Assignment => self.assignment = value,
            ScoreField::Exam => self.exam = value,
        }
    }

    pub fn with(mut self, field: ScoreField, raw: i64) -> Self {
        self.set(field, raw);
        self
    }

    pub fn test1(&self) -> u32 {
        self.test1
    }

    pub fn test2(&self) -> u32 {
        self.test2
    }

    pub fn assignment(&self) -> u32 {
        self.assignment
    }

    pub fn exam(&self) -> u32 {
        self.exam
    }

    pub fn total(&self) -> u32 {
        self.test1 + self.test2 + self.assignment + self.exam
    }
}

/// Components together with the derived total, grade and remark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EvaluatedScore {
    #[serde(flatten)]
    pub components: ScoreComponents,
    pub total: u32,
    pub grade: &'static str,
    pub remark: &'static str,
}

impl EvaluatedScore {
    pub fn is_pass(&self) -> bool {
        is_promotion_eligible(self.total)
    }
}

/// Sums the components and grades the result.
pub fn evaluate(components: ScoreComponents) -> EvaluatedScore {
    let total = components.total();
    let band = graded_band(total);
    EvaluatedScore {
        components,
        total,
        grade: band.grade,
        remark: band.remark,
    }
}

// Clamped components never sum past MAX_TOTAL, so the lookup cannot miss.
fn graded_band(total: u32) -> &'static GradeBand {
    band_for(total.min(MAX_TOTAL)).unwrap_or(&GRADING_TABLE[GRADING_TABLE.len() - 1])
}
