use chrono::NaiveDate;
use school_core::core::services::{FeeService, PaymentRequest};
use school_core::fees::{ledger_for, FeeStatus, FeeStructure, PaymentMethod};
use school_core::records::fixtures::demo_records;

fn schedule() -> Vec<FeeStructure> {
    vec![FeeStructure::new("JSS1", 15_000_000, 2_500_000, 1_000_000)]
}

#[test]
fn ledger_boundaries_follow_payment_totals() {
    let fees = schedule();
    let expected = fees[0].total();

    let settled = ledger_for(&fees, "STU-1", "JSS1", expected);
    assert_eq!((settled.status, settled.balance), (FeeStatus::Paid, 0));

    let untouched = ledger_for(&fees, "STU-1", "JSS1", 0);
    assert_eq!(untouched.status, FeeStatus::Unpaid);
    assert_eq!(untouched.balance, expected);

    let half = ledger_for(&fees, "STU-1", "JSS1", expected / 2);
    assert_eq!(half.status, FeeStatus::Partial);
}

#[test]
fn overpayment_keeps_signed_balance() {
    let fees = schedule();
    let view = ledger_for(&fees, "STU-1", "JSS1", fees[0].total() + 500);
    assert_eq!(view.balance, -500);
    assert_eq!(view.amount_due(), 0);
    assert_eq!(view.overpaid(), 500);
    assert_eq!(view.status, FeeStatus::Paid);
}

#[test]
fn classes_without_structure_owe_nothing() {
    let fees = schedule();
    let view = ledger_for(&fees, "STU-9", "SS3", 0);
    assert_eq!(view.expected, 0);
    assert_eq!(view.status, FeeStatus::Paid);
}

#[test]
fn payments_accumulate_from_the_log() {
    let mut records = demo_records();
    let paid_on = NaiveDate::from_ymd_opt(2024, 11, 1).unwrap();
    for amount in [5_000_000, 3_500_000] {
        FeeService::record_payment(
            &mut records,
            PaymentRequest {
                student_id: "STU-0002",
                amount,
                method: PaymentMethod::Transfer,
                paid_on,
                reference: None,
            },
        )
        .unwrap();
    }
    let view = FeeService::ledger(&records, "STU-0002").unwrap();
    assert_eq!(view.total_paid, 18_500_000);
    assert_eq!(view.status, FeeStatus::Paid);
    assert_eq!(records.payments_for("STU-0002").count(), 3);
}

#[test]
fn collection_counts_every_status() {
    let records = demo_records();
    let summary = FeeService::collection(&records, None, None);
    assert_eq!(summary.students, 6);
    assert_eq!(summary.paid + summary.partial + summary.unpaid, 6);
    assert_eq!(summary.collected, 53_500_000);
    assert!(summary.collection_rate() > 0.0 && summary.collection_rate() < 100.0);
}
