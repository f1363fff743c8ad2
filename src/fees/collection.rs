use serde::Serialize;

use super::{FeeStatus, LedgerView};

/// Totals across a set of student ledgers, as shown on a fee-tracking table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectionSummary {
    pub students: usize,
    pub expected: i64,
    pub collected: i64,
    /// Sum of positive balances only; overpayments do not offset other debts.
    pub outstanding: i64,
    pub paid: usize,
    pub partial: usize,
    pub unpaid: usize,
}

impl CollectionSummary {
    /// Share of the expected amount collected, in percent.
    pub fn collection_rate(&self) -> f64 {
        if self.expected == 0 {
            return 100.0;
        }
        (self.collected as f64 / self.expected as f64) * 100.0
    }
}

pub fn summarize_collection<'a, I>(ledgers: I) -> CollectionSummary
where
    I: IntoIterator<Item = &'a LedgerView>,
{
    ledgers
        .into_iter()
        .fold(CollectionSummary::default(), |mut summary, view| {
            summary.students += 1;
            summary.expected = summary.expected.saturating_add(view.expected);
            summary.collected = summary.collected.saturating_add(view.total_paid);
            summary.outstanding = summary.outstanding.saturating_add(view.amount_due());
            match view.status {
                FeeStatus::Paid => summary.paid += 1,
                FeeStatus::Partial => summary.partial += 1,
                FeeStatus::Unpaid => summary.unpaid += 1,
            }
            summary
        })
}
