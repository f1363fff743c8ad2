//! Demo data matching the console's bundled mock records.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use super::entities::{Branch, School, ScoreRecord, Staff, StaffRole, Student, Term};
use super::records::SchoolRecords;
use crate::fees::{FeeStructure, Payment, PaymentMethod};
use crate::grading::ScoreComponents;

const NAIRA: i64 = 100;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn staff(id: &str, branch_id: &str, name: &str, role: StaffRole, subjects: &[&str]) -> Staff {
    Staff {
        id: id.into(),
        branch_id: branch_id.into(),
        name: name.into(),
        role,
        subjects: subjects.iter().map(|s| s.to_string()).collect(),
    }
}

fn student(id: &str, name: &str, class_id: &str, branch_id: &str, guardian: &str) -> Student {
    Student {
        id: id.into(),
        name: name.into(),
        class_id: class_id.into(),
        branch_id: branch_id.into(),
        guardian: Some(guardian.into()),
        enrolled_on: date(2024, 9, 9),
    }
}

fn payment(student_id: &str, naira: i64, method: PaymentMethod, paid_on: NaiveDate) -> Payment {
    Payment {
        id: Uuid::new_v4(),
        student_id: student_id.into(),
        amount: naira * NAIRA,
        method,
        paid_on,
        reference: Some(format!("RCPT-{}-{}", paid_on.format("%m%d"), student_id)),
        recorded_at: Utc::now(),
    }
}

/// One school with two branches, staff for every role, and a first term of results.
pub fn demo_records() -> SchoolRecords {
    let mut records = SchoolRecords::new("demo");

    records.schools.push(School {
        id: "SCH-0001".into(),
        name: "Greenfield Academy".into(),
        address: Some("12 Admiralty Way, Lekki".into()),
        created_at: Utc::now(),
    });
    records.branches.extend([
        Branch {
            id: "BR-0001".into(),
            school_id: "SCH-0001".into(),
            name: "Lekki Campus".into(),
            address: None,
        },
        Branch {
            id: "BR-0002".into(),
            school_id: "SCH-0001".into(),
            name: "Ikeja Campus".into(),
            address: None,
        },
    ]);

    records.staff.extend([
        staff("STF-0001", "BR-0001", "Adaeze Okafor", StaffRole::BranchAdmin, &[]),
        staff(
            "STF-0002",
            "BR-0001",
            "Tunde Bakare",
            StaffRole::Teacher,
            &["Mathematics", "Basic Science"],
        ),
        staff(
            "STF-0003",
            "BR-0001",
            "Ngozi Eze",
            StaffRole::Teacher,
            &["English Language"],
        ),
        staff("STF-0004", "BR-0001", "Ibrahim Musa", StaffRole::Bursar, &[]),
        staff("STF-0005", "BR-0001", "Funke Adeyemi", StaffRole::Librarian, &[]),
        staff("STF-0006", "BR-0002", "Chinedu Obi", StaffRole::Receptionist, &[]),
        staff("STF-0007", "BR-0002", "Halima Yusuf", StaffRole::BranchAdmin, &[]),
    ]);

    records.students.extend([
        student("STU-0001", "Chiamaka Nwosu", "JSS1", "BR-0001", "Mrs. Nwosu"),
        student("STU-0002", "Daniel Ajayi", "JSS1", "BR-0001", "Mr. Ajayi"),
        student("STU-0003", "Aisha Bello", "JSS1", "BR-0001", "Mrs. Bello"),
        student("STU-0004", "Emeka Uche", "JSS2", "BR-0001", "Mr. Uche"),
        student("STU-0005", "Zainab Lawal", "JSS2", "BR-0002", "Mrs. Lawal"),
        student("STU-0006", "Samuel Ojo", "JSS1", "BR-0002", "Mr. Ojo"),
    ]);

    records.fee_structures.extend([
        FeeStructure::new("JSS1", 150_000 * NAIRA, 25_000 * NAIRA, 10_000 * NAIRA),
        FeeStructure::new("JSS2", 165_000 * NAIRA, 25_000 * NAIRA, 10_000 * NAIRA),
    ]);

    records.payments.extend([
        payment("STU-0001", 185_000, PaymentMethod::Transfer, date(2024, 9, 12)),
        payment("STU-0002", 100_000, PaymentMethod::Cash, date(2024, 9, 13)),
        payment("STU-0004", 120_000, PaymentMethod::Card, date(2024, 9, 18)),
        payment("STU-0004", 80_000, PaymentMethod::Transfer, date(2024, 10, 2)),
        payment("STU-0005", 50_000, PaymentMethod::Cash, date(2024, 9, 20)),
    ]);

    let results: [(&str, &str, [i64; 4]); 10] = [
        ("STU-0001", "Mathematics", [9, 8, 18, 52]),
        ("STU-0001", "English Language", [8, 9, 17, 44]),
        ("STU-0002", "Mathematics", [6, 5, 12, 31]),
        ("STU-0002", "English Language", [7, 6, 14, 35]),
        ("STU-0003", "Mathematics", [4, 3, 8, 20]),
        ("STU-0003", "English Language", [5, 5, 10, 24]),
        ("STU-0004", "Mathematics", [10, 9, 19, 55]),
        ("STU-0004", "Basic Science", [8, 8, 16, 40]),
        ("STU-0005", "Mathematics", [7, 7, 15, 38]),
        ("STU-0006", "English Language", [6, 6, 13, 30]),
    ];
    for (student_id, subject, [test1, test2, assignment, exam]) in results {
        records.scores.push(ScoreRecord::new(
            student_id,
            subject,
            Term::First,
            ScoreComponents::clamped(test1, test2, assignment, exam),
        ));
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fees::{FeeStatus, PaymentLedger};

    #[test]
    fn demo_records_are_consistent() {
        let records = demo_records();
        assert!(records.warnings().is_empty(), "{:?}", records.warnings());
    }

    #[test]
    fn demo_ledgers_cover_every_status() {
        let records = demo_records();
        let statuses: Vec<FeeStatus> = records
            .students
            .iter()
            .map(|student| records.ledger(student).status)
            .collect();
        assert!(statuses.contains(&FeeStatus::Paid));
        assert!(statuses.contains(&FeeStatus::Partial));
        assert!(statuses.contains(&FeeStatus::Unpaid));
        assert_eq!(records.total_paid("STU-0004"), 200_000 * NAIRA);
    }
}
