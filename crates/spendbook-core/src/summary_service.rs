use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;
use spendbook_domain::{Transaction, TransactionKind};
use tracing::debug;

/// Totals and per-day averages for a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    pub avg_income: f64,
    pub avg_expense: f64,
    pub avg_balance: f64,
    /// Distinct dates present in the input.
    pub day_count: usize,
    pub transaction_count: usize,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.transaction_count == 0
    }

    /// Share of income kept, as a whole-number percentage. `None` without income.
    pub fn savings_rate(&self) -> Option<i64> {
        if self.total_income > 0.0 {
            Some(percent(self.balance, self.total_income))
        } else {
            None
        }
    }
}

pub struct SummaryService;

impl SummaryService {
    pub fn summarize<'a, I>(transactions: I) -> Summary
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut total_income = 0.0;
        let mut total_expense = 0.0;
        let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();
        let mut transaction_count = 0;

        for txn in transactions {
            match txn.kind {
                TransactionKind::Income => total_income += txn.amount,
                TransactionKind::Expense => total_expense += txn.amount,
            }
            dates.insert(txn.date);
            transaction_count += 1;
        }

        let day_count = dates.len();
        let divisor = day_count.max(1) as f64;
        let balance = total_income - total_expense;
        let summary = Summary {
            total_income,
            total_expense,
            balance,
            avg_income: total_income / divisor,
            avg_expense: total_expense / divisor,
            avg_balance: balance / divisor,
            day_count,
            transaction_count,
        };
        debug!(
            income = summary.total_income,
            expense = summary.total_expense,
            days = summary.day_count,
            "summarized transactions"
        );
        summary
    }

    /// Sum of amounts of `kind` whose date satisfies `predicate`.
    pub fn total_where<'a, I, P>(transactions: I, kind: TransactionKind, predicate: P) -> f64
    where
        I: IntoIterator<Item = &'a Transaction>,
        P: Fn(NaiveDate) -> bool,
    {
        transactions
            .into_iter()
            .filter(|txn| txn.kind == kind && predicate(txn.date))
            .map(|txn| txn.amount)
            .sum()
    }
}

/// `part / whole` as a rounded whole-number percentage. Callers guard `whole != 0`.
pub fn percent(part: f64, whole: f64) -> i64 {
    (part / whole * 100.0).round() as i64
}

/// Rounded percentage change from `baseline` to `current`, `None` when the baseline is zero.
pub fn percent_change(current: f64, baseline: f64) -> Option<i64> {
    if baseline == 0.0 {
        None
    } else {
        Some(percent(current - baseline, baseline))
    }
}
