use serde::Serialize;

use crate::errors::{Result, SchoolError};

/// Minimum total that makes a subject result promotion-eligible.
pub const PASS_MARK: u32 = 40;

/// Highest total the grading table covers.
pub const MAX_TOTAL: u32 = 100;

/// A closed interval of totals mapped to a letter grade and remark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GradeBand {
    pub min: u32,
    pub max: u32,
    pub grade: &'static str,
    pub remark: &'static str,
}

impl GradeBand {
    const fn new(min: u32, max: u32, grade: &'static str, remark: &'static str) -> Self {
        Self {
            min,
            max,
            grade,
            remark,
        }
    }

    pub fn contains(&self, total: u32) -> bool {
        self.min <= total && total <= self.max
    }
}

/// Bands ordered from the highest grade down; together they partition 0..=100.
pub const GRADING_TABLE: [GradeBand; 9] = [
    GradeBand::new(75, 100, "A1", "Excellent"),
    GradeBand::new(70, 74, "B2", "Very Good"),
    GradeBand::new(65, 69, "B3", "Good"),
    GradeBand::new(60, 64, "C4", "Credit"),
    GradeBand::new(55, 59, "C5", "Credit"),
    GradeBand::new(50, 54, "C6", "Credit"),
    GradeBand::new(45, 49, "D7", "Pass"),
    GradeBand::new(40, 44, "E8", "Pass"),
    GradeBand::new(0, 39, "F9", "Fail"),
];

/// Returns the band containing `total`, rejecting totals above [`MAX_TOTAL`].
pub fn band_for(total: u32) -> Result<&'static GradeBand> {
    GRADING_TABLE
        .iter()
        .find(|band| band.contains(total))
        .ok_or_else(|| {
            SchoolError::InvalidInput(format!(
                "total {} is outside the grading range 0-{}",
                total, MAX_TOTAL
            ))
        })
}

pub fn is_promotion_eligible(total: u32) -> bool {
    total >= PASS_MARK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_total_maps_to_exactly_one_band() {
        for total in 0..=MAX_TOTAL {
            let matches = GRADING_TABLE
                .iter()
                .filter(|band| band.contains(total))
                .count();
            assert_eq!(matches, 1, "total {total} matched {matches} bands");
            assert!(band_for(total).is_ok());
        }
    }

    #[test]
    fn bands_are_contiguous_from_top_to_bottom() {
        assert_eq!(GRADING_TABLE[0].max, MAX_TOTAL);
        assert_eq!(GRADING_TABLE[GRADING_TABLE.len() - 1].min, 0);
        for pair in GRADING_TABLE.windows(2) {
            assert_eq!(pair[1].max + 1, pair[0].min);
        }
    }

    #[test]
    fn boundary_between_pass_and_fail() {
        let fail = band_for(39).unwrap();
        assert_eq!((fail.grade, fail.remark), ("F9", "Fail"));
        let pass = band_for(40).unwrap();
        assert_eq!((pass.grade, pass.remark), ("E8", "Pass"));
        assert!(!is_promotion_eligible(39));
        assert!(is_promotion_eligible(40));
    }

    #[test]
    fn totals_above_range_are_rejected() {
        let err = band_for(101).expect_err("101 is out of range");
        assert!(matches!(err, SchoolError::InvalidInput(_)));
    }
}
