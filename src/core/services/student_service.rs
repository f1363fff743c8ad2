use chrono::NaiveDate;
use tracing::info;

use crate::records::{SchoolRecords, Student};

use super::{required, ServiceError, ServiceResult};

/// Admission details captured at the front desk.
#[derive(Debug, Clone)]
pub struct NewStudent<'a> {
    pub name: &'a str,
    pub class_id: &'a str,
    pub branch_id: &'a str,
    pub guardian: Option<&'a str>,
    pub enrolled_on: NaiveDate,
}

pub struct StudentService;

impl StudentService {
    pub fn admit(records: &mut SchoolRecords, admission: NewStudent<'_>) -> ServiceResult<String> {
        let name = required(admission.name, "Student name")?;
        let class_id = normalize_class(admission.class_id)?;
        if records.branch(admission.branch_id).is_none() {
            return Err(ServiceError::Invalid(format!(
                "Branch `{}` does not exist",
                admission.branch_id
            )));
        }
        let id = records.next_student_id();
        records.students.push(Student {
            id: id.clone(),
            name: name.to_string(),
            class_id,
            branch_id: admission.branch_id.to_string(),
            guardian: admission
                .guardian
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(String::from),
            enrolled_on: admission.enrolled_on,
        });
        records.touch();
        info!(student = %id, branch = admission.branch_id, "student admitted");
        Ok(id)
    }

    /// Moves a student to another class; fees follow the new class immediately.
    pub fn change_class(
        records: &mut SchoolRecords,
        student_id: &str,
        class_id: &str,
    ) -> ServiceResult<()> {
        let class_id = normalize_class(class_id)?;
        let student = records
            .students
            .iter_mut()
            .find(|student| student.id == student_id)
            .ok_or_else(|| ServiceError::Invalid(format!("Student `{}` not found", student_id)))?;
        student.class_id = class_id;
        records.touch();
        Ok(())
    }

    pub fn find<'a>(records: &'a SchoolRecords, student_id: &str) -> ServiceResult<&'a Student> {
        records
            .student(student_id)
            .ok_or_else(|| ServiceError::Invalid(format!("Student `{}` not found", student_id)))
    }
}

/// Class ids are stored trimmed and uppercased (`jss1` -> `JSS1`).
pub fn normalize_class(class_id: &str) -> ServiceResult<String> {
    let class_id = required(class_id, "Class")?;
    if class_id.chars().any(char::is_whitespace) {
        return Err(ServiceError::Invalid(format!(
            "Class `{}` must not contain spaces",
            class_id
        )));
    }
    Ok(class_id.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::fixtures::demo_records;

    fn admission<'a>(name: &'a str, branch_id: &'a str) -> NewStudent<'a> {
        NewStudent {
            name,
            class_id: "jss1",
            branch_id,
            guardian: Some("  "),
            enrolled_on: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
        }
    }

    #[test]
    fn admission_assigns_next_id_and_normalizes_class() {
        let mut records = demo_records();
        let id = StudentService::admit(&mut records, admission("Kemi Alade", "BR-0001")).unwrap();
        assert_eq!(id, "STU-0007");
        let student = records.student(&id).unwrap();
        assert_eq!(student.class_id, "JSS1");
        assert!(student.guardian.is_none());
    }

    #[test]
    fn admission_rejects_unknown_branch_without_mutation() {
        let mut records = demo_records();
        let before = records.students.len();
        assert!(StudentService::admit(&mut records, admission("Kemi", "BR-0404")).is_err());
        assert!(StudentService::admit(&mut records, admission("  ", "BR-0001")).is_err());
        assert_eq!(records.students.len(), before);
    }

    #[test]
    fn class_change_moves_fee_expectation() {
        let mut records = demo_records();
        StudentService::change_class(&mut records, "STU-0001", "jss2").unwrap();
        let student = records.student("STU-0001").unwrap().clone();
        assert_eq!(records.ledger(&student).expected, 200_000 * 100);
        assert!(normalize_class("JSS 1").is_err());
    }
}
