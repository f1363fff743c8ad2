use tracing::debug;

use crate::grading::{EvaluatedScore, ScoreComponents, ScoreField};
use crate::records::{SchoolRecords, ScoreRecord, Term};

use super::{required, ServiceError, ServiceResult};

pub struct ScoreService;

impl ScoreService {
    /// Stores a full set of marks and returns the re-evaluated score.
    pub fn record(
        records: &mut SchoolRecords,
        student_id: &str,
        subject: &str,
        term: Term,
        components: ScoreComponents,
    ) -> ServiceResult<EvaluatedScore> {
        let subject = Self::validate(records, student_id, subject)?;
        let evaluated =
            records.upsert_score(ScoreRecord::new(student_id, subject, term, components));
        debug!(
            student = student_id,
            subject,
            total = evaluated.total,
            grade = evaluated.grade,
            "score recorded"
        );
        Ok(evaluated)
    }

    /// Changes one field of an existing (or blank) entry and re-evaluates immediately.
    pub fn edit_field(
        records: &mut SchoolRecords,
        student_id: &str,
        subject: &str,
        term: Term,
        field: ScoreField,
        raw: i64,
    ) -> ServiceResult<EvaluatedScore> {
        let subject = Self::validate(records, student_id, subject)?;
        let components = records
            .score(student_id, subject, term)
            .map(|existing| existing.components)
            .unwrap_or_default()
            .with(field, raw);
        Self::record(records, student_id, subject, term, components)
    }

    fn validate<'a>(
        records: &SchoolRecords,
        student_id: &str,
        subject: &'a str,
    ) -> ServiceResult<&'a str> {
        let subject = required(subject, "Subject")?;
        if records.student(student_id).is_none() {
            return Err(ServiceError::Invalid(format!(
                "Student `{}` not found",
                student_id
            )));
        }
        Ok(subject)
    }
}
