use chrono::NaiveDate;
use tracing::info;

use crate::fees::{
    check_amount, summarize_collection, CollectionSummary, FeeStructure, LedgerView, Payment,
    PaymentLedger, PaymentMethod, MAX_AMOUNT,
};
use crate::records::{SchoolRecords, Student};

use super::student_service::normalize_class;
use super::{ServiceError, ServiceResult};

/// Details of a payment being taken at the bursary.
#[derive(Debug, Clone)]
pub struct PaymentRequest<'a> {
    pub student_id: &'a str,
    pub amount: i64,
    pub method: PaymentMethod,
    pub paid_on: NaiveDate,
    pub reference: Option<&'a str>,
}

pub struct FeeService;

impl FeeService {
    pub fn set_structure(
        records: &mut SchoolRecords,
        class_id: &str,
        tuition: i64,
        development: i64,
        other: i64,
    ) -> ServiceResult<FeeStructure> {
        let class_id = normalize_class(class_id)?;
        if [tuition, development, other].iter().any(|amount| *amount < 0) {
            return Err(ServiceError::Invalid(
                "Fee components must not be negative".into(),
            ));
        }
        check_amount(tuition, "tuition")?;
        check_amount(development, "development levy")?;
        check_amount(other, "other fees")?;
        let structure = FeeStructure::new(class_id, tuition, development, other);
        records.upsert_fee_structure(structure.clone());
        info!(class = %structure.class_id, total = structure.total(), "fee structure set");
        Ok(structure)
    }

    /// Appends a payment to the log and returns the student's updated ledger.
    pub fn record_payment(
        records: &mut SchoolRecords,
        request: PaymentRequest<'_>,
    ) -> ServiceResult<LedgerView> {
        let student = records
            .student(request.student_id)
            .cloned()
            .ok_or_else(|| {
                ServiceError::Invalid(format!("Student `{}` not found", request.student_id))
            })?;
        let mut payment = Payment::new(
            &student.id,
            request.amount,
            request.method,
            request.paid_on,
        )?;
        if let Some(reference) = request.reference {
            payment = payment.with_reference(reference);
        }
        let new_total = records
            .total_paid(&student.id)
            .checked_add(payment.amount)
            .filter(|total| *total <= MAX_AMOUNT)
            .ok_or_else(|| {
                ServiceError::Invalid(format!(
                    "Payments for {} would exceed the limit of {} minor units",
                    student.id, MAX_AMOUNT
                ))
            })?;
        info!(
            student = %student.id,
            amount = payment.amount,
            method = %payment.method,
            total = new_total,
            "payment recorded"
        );
        records.record_payment(payment);
        Ok(records.ledger(&student))
    }

    pub fn ledger(records: &SchoolRecords, student_id: &str) -> ServiceResult<LedgerView> {
        records
            .student(student_id)
            .map(|student| records.ledger(student))
            .ok_or_else(|| ServiceError::Invalid(format!("Student `{}` not found", student_id)))
    }

    /// Ledger rows for every student matching the filters, in admission order.
    pub fn ledgers<'a>(
        records: &'a SchoolRecords,
        branch_id: Option<&'a str>,
        class_id: Option<&'a str>,
    ) -> Vec<(&'a Student, LedgerView)> {
        records
            .students_filtered(branch_id, class_id)
            .map(|student| (student, records.ledger(student)))
            .collect()
    }

    pub fn collection(
        records: &SchoolRecords,
        branch_id: Option<&str>,
        class_id: Option<&str>,
    ) -> CollectionSummary {
        let rows = Self::ledgers(records, branch_id, class_id);
        summarize_collection(rows.iter().map(|(_, view)| view))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fees::FeeStatus;
    use crate::records::fixtures::demo_records;

    fn request(student_id: &str, amount: i64) -> PaymentRequest<'_> {
        PaymentRequest {
            student_id,
            amount,
            method: PaymentMethod::Cash,
            paid_on: NaiveDate::from_ymd_opt(2024, 11, 4).unwrap(),
            reference: Some("RCPT-77"),
        }
    }

    #[test]
    fn payment_moves_unpaid_student_to_partial_then_paid() {
        let mut records = demo_records();
        assert_eq!(
            FeeService::ledger(&records, "STU-0003").unwrap().status,
            FeeStatus::Unpaid
        );
        let partial = FeeService::record_payment(&mut records, request("STU-0003", 9_250_000))
            .unwrap();
        assert_eq!(partial.status, FeeStatus::Partial);
        assert_eq!(partial.balance, 9_250_000);
        let paid = FeeService::record_payment(&mut records, request("STU-0003", 9_250_000))
            .unwrap();
        assert_eq!(paid.status, FeeStatus::Paid);
        assert_eq!(paid.balance, 0);
    }

    #[test]
    fn invalid_payments_leave_log_untouched() {
        let mut records = demo_records();
        let before = records.payments.len();
        assert!(FeeService::record_payment(&mut records, request("STU-0003", 0)).is_err());
        assert!(FeeService::record_payment(&mut records, request("STU-0404", 10)).is_err());
        assert_eq!(records.payments.len(), before);
    }

    #[test]
    fn negative_fee_components_are_rejected() {
        let mut records = demo_records();
        assert!(FeeService::set_structure(&mut records, "SS1", 100, -1, 0).is_err());
        let structure = FeeService::set_structure(&mut records, "ss1", 100, 20, 3).unwrap();
        assert_eq!(structure.class_id, "SS1");
        assert_eq!(structure.total(), 123);
    }

    #[test]
    fn oversized_fee_components_are_rejected() {
        let mut records = demo_records();
        let before = records.fee_structures.clone();
        let huge = 5_000_000_000_000_000_000;
        assert!(FeeService::set_structure(&mut records, "SS9", huge, huge, 0).is_err());
        assert!(FeeService::set_structure(&mut records, "SS9", MAX_AMOUNT + 1, 0, 0).is_err());
        assert_eq!(records.fee_structures, before);
        let capped =
            FeeService::set_structure(&mut records, "SS9", MAX_AMOUNT, MAX_AMOUNT, MAX_AMOUNT)
                .unwrap();
        assert_eq!(capped.total(), 3 * MAX_AMOUNT);
    }

    #[test]
    fn payments_beyond_the_cumulative_limit_leave_log_untouched() {
        let mut records = demo_records();
        let first = FeeService::record_payment(&mut records, request("STU-0003", MAX_AMOUNT - 1))
            .unwrap();
        assert_eq!(first.status, FeeStatus::Paid);
        let before = records.payments.len();
        let err = FeeService::record_payment(&mut records, request("STU-0003", 2)).unwrap_err();
        assert!(err.to_string().contains("exceed"));
        assert_eq!(records.payments.len(), before);
        assert_eq!(
            FeeService::ledger(&records, "STU-0003").unwrap().total_paid,
            MAX_AMOUNT - 1
        );
    }

    #[test]
    fn collection_summary_respects_branch_filter() {
        let records = demo_records();
        let lekki = FeeService::collection(&records, Some("BR-0001"), None);
        assert_eq!(lekki.students, 4);
        assert_eq!((lekki.paid, lekki.partial, lekki.unpaid), (2, 1, 1));
        let all = FeeService::collection(&records, None, None);
        assert_eq!(all.students, 6);
    }
}
