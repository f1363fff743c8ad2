use std::fmt;

use serde::{Deserialize, Serialize};

use super::FeeStructure;

/// Lookup of the fee structure registered for a class.
pub trait FeeSchedule {
    fn fee_structure(&self, class_id: &str) -> Option<&FeeStructure>;

    /// Expected fee for a class; classes without a structure owe nothing.
    fn expected_fee(&self, class_id: &str) -> i64 {
        self.fee_structure(class_id)
            .map(FeeStructure::total)
            .unwrap_or(0)
    }
}

impl FeeSchedule for [FeeStructure] {
    fn fee_structure(&self, class_id: &str) -> Option<&FeeStructure> {
        self.iter()
            .find(|structure| structure.class_id.eq_ignore_ascii_case(class_id))
    }
}

impl FeeSchedule for Vec<FeeStructure> {
    fn fee_structure(&self, class_id: &str) -> Option<&FeeStructure> {
        self.as_slice().fee_structure(class_id)
    }
}

/// Source of cumulative payment totals per student.
pub trait PaymentLedger {
    fn total_paid(&self, student_id: &str) -> i64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeeStatus {
    Paid,
    Partial,
    Unpaid,
}

impl FeeStatus {
    pub fn label(self) -> &'static str {
        match self {
            FeeStatus::Paid => "Paid",
            FeeStatus::Partial => "Partial",
            FeeStatus::Unpaid => "Unpaid",
        }
    }
}

impl fmt::Display for FeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Derived fee position of one student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerView {
    pub student_id: String,
    pub class_id: String,
    pub expected: i64,
    pub total_paid: i64,
    /// Signed; negative when the student has overpaid.
    pub balance: i64,
    pub status: FeeStatus,
}

impl LedgerView {
    /// Balance floored at zero for display.
    pub fn amount_due(&self) -> i64 {
        self.balance.max(0)
    }

    pub fn overpaid(&self) -> i64 {
        self.balance.saturating_neg().max(0)
    }
}

/// Paid once nothing is owed (including when nothing was ever due),
/// Unpaid when nothing has been paid, Partial otherwise.
pub fn fee_status(expected: i64, total_paid: i64) -> FeeStatus {
    if expected.saturating_sub(total_paid) <= 0 {
        FeeStatus::Paid
    } else if total_paid == 0 {
        FeeStatus::Unpaid
    } else {
        FeeStatus::Partial
    }
}

pub fn ledger_for<S>(
    schedule: &S,
    student_id: &str,
    class_id: &str,
    total_paid: i64,
) -> LedgerView
where
    S: FeeSchedule + ?Sized,
{
    let expected = schedule.expected_fee(class_id);
    LedgerView {
        student_id: student_id.to_string(),
        class_id: class_id.to_string(),
        expected,
        total_paid,
        balance: expected.saturating_sub(total_paid),
        status: fee_status(expected, total_paid),
    }
}
