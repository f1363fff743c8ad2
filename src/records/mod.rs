//! Record collections backing the console: schools, branches, staff, students,
//! fee structures, the payment log, and authored scores.

pub mod entities;
pub mod fixtures;
#[allow(clippy::module_inception)]
pub mod records;

pub use entities::{Branch, School, ScoreRecord, Staff, StaffRole, Student, Term};
pub use records::{SchoolRecords, CURRENT_SCHEMA_VERSION};
