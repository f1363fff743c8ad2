use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entities::{Branch, School, ScoreRecord, Staff, Student, Term};
use crate::fees::{self, ledger_for, FeeSchedule, FeeStructure, LedgerView, Payment, PaymentLedger};
use crate::grading::EvaluatedScore;

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

fn default_schema_version() -> u8 {
    CURRENT_SCHEMA_VERSION
}

/// Every collection the console manages, persisted together as one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolRecords {
    pub name: String,
    #[serde(default = "default_schema_version")]
    pub schema_version: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub schools: Vec<School>,
    #[serde(default)]
    pub branches: Vec<Branch>,
    #[serde(default)]
    pub staff: Vec<Staff>,
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub fee_structures: Vec<FeeStructure>,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub scores: Vec<ScoreRecord>,
}

impl SchoolRecords {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            schema_version: CURRENT_SCHEMA_VERSION,
            created_at: now,
            updated_at: now,
            schools: Vec::new(),
            branches: Vec::new(),
            staff: Vec::new(),
            students: Vec::new(),
            fee_structures: Vec::new(),
            payments: Vec::new(),
            scores: Vec::new(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn school(&self, id: &str) -> Option<&School> {
        self.schools.iter().find(|school| school.id == id)
    }

    pub fn branch(&self, id: &str) -> Option<&Branch> {
        self.branches.iter().find(|branch| branch.id == id)
    }

    pub fn student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|student| student.id == id)
    }

    pub fn staff_member(&self, id: &str) -> Option<&Staff> {
        self.staff.iter().find(|member| member.id == id)
    }

    pub fn branches_of<'a>(&'a self, school_id: &'a str) -> impl Iterator<Item = &'a Branch> {
        self.branches
            .iter()
            .filter(move |branch| branch.school_id == school_id)
    }

    pub fn staff_in_branch<'a>(&'a self, branch_id: &'a str) -> impl Iterator<Item = &'a Staff> {
        self.staff
            .iter()
            .filter(move |member| member.branch_id == branch_id)
    }

    /// Students narrowed by optional branch and class filters.
    pub fn students_filtered<'a>(
        &'a self,
        branch_id: Option<&'a str>,
        class_id: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Student> {
        self.students.iter().filter(move |student| {
            branch_id.map_or(true, |branch| student.branch_id == branch)
                && class_id.map_or(true, |class| student.class_id.eq_ignore_ascii_case(class))
        })
    }

    /// Distinct class ids used by students or fee structures, sorted.
    pub fn classes(&self) -> Vec<String> {
        let set: BTreeSet<String> = self
            .students
            .iter()
            .map(|student| student.class_id.clone())
            .chain(
                self.fee_structures
                    .iter()
                    .map(|structure| structure.class_id.clone()),
            )
            .collect();
        set.into_iter().collect()
    }

    /// Returns the next free id for `prefix`, e.g. `STU-0004` after `STU-0003`.
    pub fn next_id<'a, I>(prefix: &str, existing: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        let marker = format!("{}-", prefix);
        let used: BTreeSet<u64> = existing
            .into_iter()
            .filter_map(|id| id.strip_prefix(&marker))
            .filter_map(|suffix| suffix.parse::<u64>().ok())
            .collect();
        // A hand-edited store may already hold the largest suffix; reuse the lowest gap then.
        let next = match used.last() {
            Some(highest) => highest
                .checked_add(1)
                .unwrap_or_else(|| (1..).find(|n| !used.contains(n)).unwrap_or(1)),
            None => 1,
        };
        format!("{}{:04}", marker, next)
    }

    pub fn next_school_id(&self) -> String {
        Self::next_id("SCH", self.schools.iter().map(|s| s.id.as_str()))
    }

    pub fn next_branch_id(&self) -> String {
        Self::next_id("BR", self.branches.iter().map(|b| b.id.as_str()))
    }

    pub fn next_staff_id(&self) -> String {
        Self::next_id("STF", self.staff.iter().map(|s| s.id.as_str()))
    }

    pub fn next_student_id(&self) -> String {
        Self::next_id("STU", self.students.iter().map(|s| s.id.as_str()))
    }

    /// Registers or replaces the fee structure for a class.
    pub fn upsert_fee_structure(&mut self, structure: FeeStructure) {
        match self
            .fee_structures
            .iter_mut()
            .find(|existing| existing.class_id.eq_ignore_ascii_case(&structure.class_id))
        {
            Some(existing) => *existing = structure,
            None => self.fee_structures.push(structure),
        }
        self.touch();
    }

    /// Appends to the payment log.
    pub fn record_payment(&mut self, payment: Payment) {
        self.payments.push(payment);
        self.touch();
    }

    pub fn payments_for<'a>(&'a self, student_id: &'a str) -> impl Iterator<Item = &'a Payment> {
        self.payments
            .iter()
            .filter(move |payment| payment.student_id == student_id)
    }

    pub fn ledger(&self, student: &Student) -> LedgerView {
        ledger_for(
            self,
            &student.id,
            &student.class_id,
            self.total_paid(&student.id),
        )
    }

    pub fn score(&self, student_id: &str, subject: &str, term: Term) -> Option<&ScoreRecord> {
        self.scores
            .iter()
            .find(|record| record.matches(student_id, subject, term))
    }

    /// Stores the record, replacing any entry for the same student, subject and term,
    /// and returns the freshly evaluated score.
    pub fn upsert_score(&mut self, record: ScoreRecord) -> EvaluatedScore {
        let evaluated = record.evaluated();
        match self
            .scores
            .iter_mut()
            .find(|existing| existing.matches(&record.student_id, &record.subject, record.term))
        {
            Some(existing) => {
                existing.components = record.components;
                existing.updated_at = record.updated_at;
            }
            None => self.scores.push(record),
        }
        self.touch();
        evaluated
    }

    pub fn scores_for<'a>(
        &'a self,
        student_id: &'a str,
        term: Term,
    ) -> impl Iterator<Item = &'a ScoreRecord> {
        self.scores
            .iter()
            .filter(move |record| record.student_id == student_id && record.term == term)
    }

    /// Dangling references and other anomalies worth surfacing after a load.
    pub fn warnings(&self) -> Vec<String> {
        let school_ids: HashSet<&str> = self.schools.iter().map(|s| s.id.as_str()).collect();
        let branch_ids: HashSet<&str> = self.branches.iter().map(|b| b.id.as_str()).collect();
        let student_ids: HashSet<&str> = self.students.iter().map(|s| s.id.as_str()).collect();
        let mut warnings = Vec::new();

        for branch in &self.branches {
            if !school_ids.contains(branch.school_id.as_str()) {
                warnings.push(format!(
                    "branch {} references unknown school {}",
                    branch.id, branch.school_id
                ));
            }
        }
        for member in &self.staff {
            if !branch_ids.contains(member.branch_id.as_str()) {
                warnings.push(format!(
                    "staff {} references unknown branch {}",
                    member.id, member.branch_id
                ));
            }
        }
        for student in &self.students {
            if !branch_ids.contains(student.branch_id.as_str()) {
                warnings.push(format!(
                    "student {} references unknown branch {}",
                    student.id, student.branch_id
                ));
            }
            if self.fee_structure(&student.class_id).is_none() {
                warnings.push(format!(
                    "student {} is in class {} which has no fee structure",
                    student.id, student.class_id
                ));
            }
        }
        for payment in &self.payments {
            if !student_ids.contains(payment.student_id.as_str()) {
                warnings.push(format!(
                    "payment {} references unknown student {}",
                    payment.id, payment.student_id
                ));
            }
        }
        for record in &self.scores {
            if !student_ids.contains(record.student_id.as_str()) {
                warnings.push(format!(
                    "{} score for {} references unknown student {}",
                    record.subject, record.term, record.student_id
                ));
            }
        }
        warnings
    }
}

impl FeeSchedule for SchoolRecords {
    fn fee_structure(&self, class_id: &str) -> Option<&FeeStructure> {
        self.fee_structures.fee_structure(class_id)
    }
}

impl PaymentLedger for SchoolRecords {
    fn total_paid(&self, student_id: &str) -> i64 {
        fees::total_paid(&self.payments, student_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fees::{FeeStatus, PaymentMethod};
    use crate::grading::ScoreComponents;
    use chrono::NaiveDate;

    fn student(id: &str, class_id: &str) -> Student {
        Student {
            id: id.into(),
            name: format!("Student {id}"),
            class_id: class_id.into(),
            branch_id: "BR-0001".into(),
            guardian: None,
            enrolled_on: NaiveDate::from_ymd_opt(2024, 9, 9).unwrap(),
        }
    }

    #[test]
    fn next_id_skips_past_highest_suffix() {
        let ids = ["STU-0001", "STU-0007", "SCH-0099", "STU-abc"];
        assert_eq!(SchoolRecords::next_id("STU", ids), "STU-0008");
        assert_eq!(SchoolRecords::next_id("BR", ids), "BR-0001");
    }

    #[test]
    fn next_id_survives_largest_suffix() {
        let ids = ["STU-4294967295"];
        assert_eq!(SchoolRecords::next_id("STU", ids), "STU-4294967296");
        let ids = ["STU-18446744073709551615", "STU-0001"];
        assert_eq!(SchoolRecords::next_id("STU", ids), "STU-0002");
    }

    #[test]
    fn ledger_derives_total_paid_from_log() {
        let mut records = SchoolRecords::new("test");
        records.upsert_fee_structure(FeeStructure::new("JSS1", 1_000, 0, 0));
        let pupil = student("STU-0001", "JSS1");
        records.students.push(pupil.clone());
        let day = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
        records.record_payment(Payment::new("STU-0001", 300, PaymentMethod::Cash, day).unwrap());
        records.record_payment(Payment::new("STU-0001", 200, PaymentMethod::Card, day).unwrap());

        let view = records.ledger(&pupil);
        assert_eq!(view.total_paid, 500);
        assert_eq!(view.status, FeeStatus::Partial);
    }

    #[test]
    fn upsert_score_replaces_existing_entry() {
        let mut records = SchoolRecords::new("test");
        records.upsert_score(ScoreRecord::new(
            "STU-0001",
            "English",
            Term::First,
            ScoreComponents::clamped(5, 5, 10, 20),
        ));
        let evaluated = records.upsert_score(ScoreRecord::new(
            "STU-0001",
            "english",
            Term::First,
            ScoreComponents::clamped(10, 10, 20, 50),
        ));
        assert_eq!(records.scores.len(), 1);
        assert_eq!(evaluated.total, 90);
        assert_eq!(records.scores[0].subject, "English");
    }

    #[test]
    fn warnings_flag_dangling_references() {
        let mut records = SchoolRecords::new("test");
        records.students.push(student("STU-0001", "JSS3"));
        let day = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
        records.record_payment(Payment::new("STU-0404", 10, PaymentMethod::Cash, day).unwrap());
        let warnings = records.warnings();
        assert!(warnings.iter().any(|w| w.contains("unknown branch BR-0001")));
        assert!(warnings.iter().any(|w| w.contains("no fee structure")));
        assert!(warnings.iter().any(|w| w.contains("unknown student STU-0404")));
    }

    #[test]
    fn classes_merge_students_and_fee_structures() {
        let mut records = SchoolRecords::new("test");
        records.students.push(student("STU-0001", "JSS2"));
        records.upsert_fee_structure(FeeStructure::new("JSS1", 1, 0, 0));
        records.upsert_fee_structure(FeeStructure::new("JSS2", 1, 0, 0));
        assert_eq!(records.classes(), vec!["JSS1".to_string(), "JSS2".to_string()]);
    }
}
