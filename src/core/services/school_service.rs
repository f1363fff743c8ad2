use chrono::Utc;
use tracing::info;

use crate::records::{Branch, School, SchoolRecords, Staff, StaffRole};

use super::{required, ServiceError, ServiceResult};

pub struct SchoolService;

impl SchoolService {
    pub fn add_school(
        records: &mut SchoolRecords,
        name: &str,
        address: Option<&str>,
    ) -> ServiceResult<String> {
        let name = required(name, "School name")?;
        if records
            .schools
            .iter()
            .any(|school| school.name.eq_ignore_ascii_case(name))
        {
            return Err(ServiceError::Invalid(format!(
                "School `{}` already exists",
                name
            )));
        }
        let id = records.next_school_id();
        records.schools.push(School {
            id: id.clone(),
            name: name.to_string(),
            address: address.map(str::trim).filter(|a| !a.is_empty()).map(String::from),
            created_at: Utc::now(),
        });
        records.touch();
        info!(school = %id, "school registered");
        Ok(id)
    }

    pub fn add_branch(
        records: &mut SchoolRecords,
        school_id: &str,
        name: &str,
    ) -> ServiceResult<String> {
        let name = required(name, "Branch name")?;
        if records.school(school_id).is_none() {
            return Err(ServiceError::Invalid(format!(
                "School `{}` does not exist",
                school_id
            )));
        }
        if records
            .branches_of(school_id)
            .any(|branch| branch.name.eq_ignore_ascii_case(name))
        {
            return Err(ServiceError::Invalid(format!(
                "Branch `{}` already exists for {}",
                name, school_id
            )));
        }
        let id = records.next_branch_id();
        records.branches.push(Branch {
            id: id.clone(),
            school_id: school_id.to_string(),
            name: name.to_string(),
            address: None,
        });
        records.touch();
        info!(branch = %id, school = school_id, "branch registered");
        Ok(id)
    }

    pub fn add_staff(
        records: &mut SchoolRecords,
        branch_id: &str,
        name: &str,
        role: StaffRole,
        subjects: &[&str],
    ) -> ServiceResult<String> {
        let name = required(name, "Staff name")?;
        if records.branch(branch_id).is_none() {
            return Err(ServiceError::Invalid(format!(
                "Branch `{}` does not exist",
                branch_id
            )));
        }
        if role != StaffRole::Teacher && !subjects.is_empty() {
            return Err(ServiceError::Invalid(
                "Only teachers can be assigned subjects".into(),
            ));
        }
        let id = records.next_staff_id();
        records.staff.push(Staff {
            id: id.clone(),
            branch_id: branch_id.to_string(),
            name: name.to_string(),
            role,
            subjects: subjects
                .iter()
                .map(|subject| subject.trim())
                .filter(|subject| !subject.is_empty())
                .map(String::from)
                .collect(),
        });
        records.touch();
        info!(staff = %id, role = %role, "staff member added");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_school() -> (SchoolRecords, String) {
        let mut records = SchoolRecords::new("test");
        let id = SchoolService::add_school(&mut records, "Greenfield", None).unwrap();
        (records, id)
    }

    #[test]
    fn school_names_are_unique_ignoring_case() {
        let (mut records, _) = with_school();
        let err = SchoolService::add_school(&mut records, "GREENFIELD", None).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(records.schools.len(), 1);
    }

    #[test]
    fn branches_require_an_existing_school() {
        let (mut records, school_id) = with_school();
        assert!(SchoolService::add_branch(&mut records, "SCH-0404", "Annex").is_err());
        let branch = SchoolService::add_branch(&mut records, &school_id, "Annex").unwrap();
        assert_eq!(branch, "BR-0001");
    }

    #[test]
    fn only_teachers_take_subjects() {
        let (mut records, school_id) = with_school();
        let branch = SchoolService::add_branch(&mut records, &school_id, "Main").unwrap();
        let err = SchoolService::add_staff(
            &mut records,
            &branch,
            "Bisi",
            StaffRole::Bursar,
            &["Accounting"],
        )
        .unwrap_err();
        assert!(matches!(err, ServiceError::Invalid(_)));
        let id = SchoolService::add_staff(
            &mut records,
            &branch,
            "Bisi",
            StaffRole::Teacher,
            &["Mathematics", " "],
        )
        .unwrap();
        assert_eq!(records.staff_member(&id).unwrap().subjects, vec!["Mathematics"]);
    }
}
