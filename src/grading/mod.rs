//! Score aggregation, the grading table, and term report cards.

pub mod report;
pub mod score;
pub mod table;

pub use report::{class_standings, report_card, PromotionStatus, ReportCard, Standing, SubjectLine};
pub use score::{evaluate, EvaluatedScore, ScoreComponents, ScoreField};
pub use table::{band_for, is_promotion_eligible, GradeBand, GRADING_TABLE, MAX_TOTAL, PASS_MARK};
