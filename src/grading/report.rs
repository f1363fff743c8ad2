use std::fmt;

use serde::Serialize;

use super::score::EvaluatedScore;
use super::table::PASS_MARK;
use crate::errors::{Result, SchoolError};
use crate::records::{SchoolRecords, Term};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PromotionStatus {
    Promoted,
    Repeat,
    NoResults,
}

impl fmt::Display for PromotionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PromotionStatus::Promoted => "Promoted",
            PromotionStatus::Repeat => "Repeat",
            PromotionStatus::NoResults => "No results",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectLine {
    pub subject: String,
    pub score: EvaluatedScore,
}

/// Term results for one student, ranked against classmates in the same branch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportCard {
    pub student_id: String,
    pub student_name: String,
    pub class_id: String,
    pub term: Term,
    pub lines: Vec<SubjectLine>,
    pub grand_total: u32,
    pub average: f64,
    pub position: Option<usize>,
    pub class_size: usize,
    pub promotion: PromotionStatus,
}

impl ReportCard {
    pub fn subjects_passed(&self) -> usize {
        self.lines.iter().filter(|line| line.score.is_pass()).count()
    }
}

/// A student's standing within their class for a term.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    pub student_id: String,
    pub grand_total: u32,
    pub average: f64,
    pub position: usize,
}

fn term_totals(records: &SchoolRecords, student_id: &str, term: Term) -> Option<(u32, f64)> {
    let totals: Vec<u32> = records
        .scores_for(student_id, term)
        .map(|record| record.evaluated().total)
        .collect();
    if totals.is_empty() {
        return None;
    }
    let grand_total: u32 = totals.iter().sum();
    Some((grand_total, f64::from(grand_total) / totals.len() as f64))
}

/// Ranks students of a class and branch by term average. Tied averages share a
/// position and the next position skips accordingly (1, 1, 3).
pub fn class_standings(
    records: &SchoolRecords,
    class_id: &str,
    branch_id: &str,
    term: Term,
) -> Vec<Standing> {
    let mut rows: Vec<(String, u32, f64)> = records
        .students_filtered(Some(branch_id), Some(class_id))
        .filter_map(|student| {
            term_totals(records, &student.id, term)
                .map(|(total, average)| (student.id.clone(), total, average))
        })
        .collect();
    rows.sort_by(|a, b| b.2.total_cmp(&a.2).then_with(|| a.0.cmp(&b.0)));

    let mut standings: Vec<Standing> = Vec::with_capacity(rows.len());
    for (index, (student_id, grand_total, average)) in rows.into_iter().enumerate() {
        let position = match standings.last() {
            Some(previous) if previous.average == average => previous.position,
            _ => index + 1,
        };
        standings.push(Standing {
            student_id,
            grand_total,
            average,
            position,
        });
    }
    standings
}

pub fn report_card(records: &SchoolRecords, student_id: &str, term: Term) -> Result<ReportCard> {
    let student = records
        .student(student_id)
        .ok_or_else(|| SchoolError::NotFound(format!("student {}", student_id)))?;

    let mut lines: Vec<SubjectLine> = records
        .scores_for(student_id, term)
        .map(|record| SubjectLine {
            subject: record.subject.clone(),
            score: record.evaluated(),
        })
        .collect();
    lines.sort_by(|a, b| a.subject.cmp(&b.subject));

    let standings = class_standings(records, &student.class_id, &student.branch_id, term);
    let own = standings.iter().find(|row| row.student_id == student.id);
    let (grand_total, average) = own
        .map(|row| (row.grand_total, row.average))
        .unwrap_or((0, 0.0));
    let promotion = match own {
        None => PromotionStatus::NoResults,
        Some(row) if row.average >= f64::from(PASS_MARK) => PromotionStatus::Promoted,
        Some(_) => PromotionStatus::Repeat,
    };

    Ok(ReportCard {
        student_id: student.id.clone(),
        student_name: student.name.clone(),
        class_id: student.class_id.clone(),
        term,
        lines,
        grand_total,
        average,
        position: own.map(|row| row.position),
        class_size: standings.len(),
        promotion,
    })
}
