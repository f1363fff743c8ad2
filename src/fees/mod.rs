//! Fee structures, the append-only payment log, and per-student ledger derivation.
//!
//! Amounts are integer minor units (kobo, cents) throughout.

pub mod collection;
pub mod ledger;
pub mod payment;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SchoolError};

pub use collection::{summarize_collection, CollectionSummary};
pub use ledger::{fee_status, ledger_for, FeeSchedule, FeeStatus, LedgerView, PaymentLedger};
pub use payment::{total_paid, Payment, PaymentMethod};

/// Largest amount, in minor units, accepted for a single fee component, a
/// payment, or a student's cumulative payments (ten trillion naira in kobo).
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// Rejects negative amounts and amounts above [`MAX_AMOUNT`].
pub fn check_amount(amount: i64, what: &str) -> Result<i64> {
    if !(0..=MAX_AMOUNT).contains(&amount) {
        return Err(SchoolError::InvalidInput(format!(
            "{} must be between 0 and {} minor units (got {})",
            what, MAX_AMOUNT, amount
        )));
    }
    Ok(amount)
}

/// Fees due per student for one class. The total is always derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeStructure {
    pub class_id: String,
    pub tuition: i64,
    pub development: i64,
    pub other: i64,
}

impl FeeStructure {
    pub fn new(class_id: impl Into<String>, tuition: i64, development: i64, other: i64) -> Self {
        Self {
            class_id: class_id.into(),
            tuition,
            development,
            other,
        }
    }

    /// Saturates instead of wrapping when a hand-edited store holds huge components.
    pub fn total(&self) -> i64 {
        self.tuition
            .saturating_add(self.development)
            .saturating_add(self.other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_tracks_component_edits() {
        let mut fees = FeeStructure::new("JSS1", 150_000_00, 25_000_00, 10_000_00);
        assert_eq!(fees.total(), 185_000_00);
        fees.other = 0;
        assert_eq!(fees.total(), 175_000_00);
    }

    #[test]
    fn stored_total_field_is_ignored() {
        let json = r#"{"class_id":"JSS2","tuition":100,"development":20,"other":5,"total":999}"#;
        let fees: FeeStructure = serde_json::from_str(json).unwrap();
        assert_eq!(fees.total(), 125);
    }

    #[test]
    fn total_saturates_on_oversized_components() {
        let fees = FeeStructure::new("SS9", i64::MAX, i64::MAX, 1);
        assert_eq!(fees.total(), i64::MAX);
    }

    #[test]
    fn amounts_outside_the_supported_range_are_rejected() {
        assert_eq!(check_amount(MAX_AMOUNT, "fee").unwrap(), MAX_AMOUNT);
        assert!(check_amount(MAX_AMOUNT + 1, "fee").is_err());
        assert!(check_amount(-1, "fee").is_err());
    }
}
