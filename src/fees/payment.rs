use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MAX_AMOUNT;
use crate::errors::{Result, SchoolError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Transfer,
    Card,
    Cheque,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Transfer => "Transfer",
            PaymentMethod::Card => "Card",
            PaymentMethod::Cheque => "Cheque",
        };
        f.write_str(label)
    }
}

impl FromStr for PaymentMethod {
    type Err = SchoolError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "transfer" | "bank" | "bank-transfer" => Ok(PaymentMethod::Transfer),
            "card" | "pos" => Ok(PaymentMethod::Card),
            "cheque" | "check" => Ok(PaymentMethod::Cheque),
            other => Err(SchoolError::InvalidInput(format!(
                "unknown payment method `{}`",
                other
            ))),
        }
    }
}

/// One entry of the append-only payment log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub student_id: String,
    pub amount: i64,
    pub method: PaymentMethod,
    pub paid_on: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl Payment {
    /// Creates a payment entry; amounts must be positive and at most [`MAX_AMOUNT`].
    pub fn new(
        student_id: impl Into<String>,
        amount: i64,
        method: PaymentMethod,
        paid_on: NaiveDate,
    ) -> Result<Self> {
        if amount <= 0 {
            return Err(SchoolError::InvalidInput(format!(
                "payment amount must be positive (got {})",
                amount
            )));
        }
        if amount > MAX_AMOUNT {
            return Err(SchoolError::InvalidInput(format!(
                "payment amount exceeds the limit of {} minor units",
                MAX_AMOUNT
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            student_id: student_id.into(),
            amount,
            method,
            paid_on,
            reference: None,
            recorded_at: Utc::now(),
        })
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        let reference = reference.into();
        self.reference = (!reference.trim().is_empty()).then_some(reference);
        self
    }
}

/// Folds the log into the cumulative amount paid by one student.
pub fn total_paid(payments: &[Payment], student_id: &str) -> i64 {
    payments
        .iter()
        .filter(|payment| payment.student_id == student_id)
        .fold(0_i64, |total, payment| total.saturating_add(payment.amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 16).unwrap()
    }

    #[test]
    fn rejects_non_positive_amounts() {
        assert!(Payment::new("STU-0001", 0, PaymentMethod::Cash, day()).is_err());
        assert!(Payment::new("STU-0001", -500, PaymentMethod::Cash, day()).is_err());
    }

    #[test]
    fn rejects_amounts_above_the_limit() {
        assert!(Payment::new("STU-0001", MAX_AMOUNT, PaymentMethod::Cash, day()).is_ok());
        assert!(Payment::new("STU-0001", MAX_AMOUNT + 1, PaymentMethod::Cash, day()).is_err());
    }

    #[test]
    fn totals_saturate_on_a_hand_edited_log() {
        let mut big = Payment::new("STU-0001", 1, PaymentMethod::Cash, day()).unwrap();
        big.amount = i64::MAX;
        let log = vec![big.clone(), big];
        assert_eq!(total_paid(&log, "STU-0001"), i64::MAX);
    }

    #[test]
    fn totals_fold_over_matching_student() {
        let log = vec![
            Payment::new("STU-0001", 40_000, PaymentMethod::Cash, day()).unwrap(),
            Payment::new("STU-0002", 10_000, PaymentMethod::Card, day()).unwrap(),
            Payment::new("STU-0001", 25_000, PaymentMethod::Transfer, day()).unwrap(),
        ];
        assert_eq!(total_paid(&log, "STU-0001"), 65_000);
        assert_eq!(total_paid(&log, "STU-0002"), 10_000);
        assert_eq!(total_paid(&log, "STU-0404"), 0);
    }

    #[test]
    fn blank_reference_is_dropped() {
        let payment = Payment::new("STU-0001", 1, PaymentMethod::Cash, day())
            .unwrap()
            .with_reference("  ");
        assert!(payment.reference.is_none());
    }

    #[test]
    fn method_aliases_parse() {
        assert_eq!("POS".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert_eq!(
            "bank".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::Transfer
        );
    }
}
