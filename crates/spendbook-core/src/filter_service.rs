//! Period filter: narrows a transaction set to the selected view.

use chrono::{Datelike, NaiveDate};
use spendbook_domain::{Transaction, ViewMode, ViewState};
use tracing::debug;

/// Resolved date predicate for a view at a given `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodFilter {
    Day(NaiveDate),
    Month { year: i32, month: u32 },
    Year(i32),
    Range { start: NaiveDate, end: NaiveDate },
    Everything,
}

impl PeriodFilter {
    pub fn resolve(view: &ViewState, today: NaiveDate) -> Self {
        match view.mode {
            ViewMode::Daily => PeriodFilter::Day(view.selected_date(today)),
            ViewMode::Monthly => {
                let month = view.selected_month(today);
                PeriodFilter::Month {
                    year: month.year,
                    month: month.month,
                }
            }
            ViewMode::Yearly => PeriodFilter::Year(view.selected_year(today)),
            ViewMode::Custom => match view.custom_range() {
                Some((start, end)) => PeriodFilter::Range { start, end },
                None => {
                    debug!("custom range not set, showing all transactions");
                    PeriodFilter::Everything
                }
            },
            ViewMode::All => PeriodFilter::Everything,
        }
    }

    pub fn matches(&self, date: NaiveDate) -> bool {
        match *self {
            PeriodFilter::Day(day) => date == day,
            PeriodFilter::Month { year, month } => date.year() == year && date.month() == month,
            PeriodFilter::Year(year) => date.year() == year,
            PeriodFilter::Range { start, end } => start <= date && date <= end,
            PeriodFilter::Everything => true,
        }
    }
}

pub struct FilterService;

impl FilterService {
    /// Returns the transactions in scope for `view`, preserving input order.
    pub fn filter<'a, I>(transactions: I, view: &ViewState, today: NaiveDate) -> Vec<&'a Transaction>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let filter = PeriodFilter::resolve(view, today);
        let selected: Vec<&Transaction> = transactions
            .into_iter()
            .filter(|txn| filter.matches(txn.date))
            .collect();
        debug!(?filter, count = selected.len(), "filtered transactions");
        selected
    }

    /// Sorts newest first by date, then by creation time.
    pub fn sort_newest_first(transactions: &mut [&Transaction]) {
        transactions.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spendbook_domain::{TransactionKind, YearMonth};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<Transaction> {
        vec![
            Transaction::new("a", 100.0, TransactionKind::Expense, date(2024, 1, 1)),
            Transaction::new("b", 300.0, TransactionKind::Income, date(2024, 1, 1)),
            Transaction::new("c", 50.0, TransactionKind::Expense, date(2024, 1, 2)),
            Transaction::new("d", 20.0, TransactionKind::Expense, date(2023, 12, 31)),
        ]
    }

    #[test]
    fn daily_view_matches_exact_date_only() {
        let txns = sample();
        let mut view = ViewState::new(ViewMode::Daily);
        view.date = Some(date(2024, 1, 1));
        let result = FilterService::filter(&txns, &view, date(2024, 6, 1));
        let names: Vec<_> = result.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn daily_view_defaults_to_today() {
        let txns = sample();
        let view = ViewState::new(ViewMode::Daily);
        assert_eq!(FilterService::filter(&txns, &view, date(2024, 1, 2)).len(), 1);
    }

    #[test]
    fn monthly_and_yearly_views_use_calendar_boundaries() {
        let txns = sample();
        let mut view = ViewState::new(ViewMode::Monthly);
        view.month = YearMonth::new(2024, 1);
        assert_eq!(FilterService::filter(&txns, &view, date(2030, 1, 1)).len(), 3);

        let mut view = ViewState::new(ViewMode::Yearly);
        view.year = Some(2023);
        assert_eq!(FilterService::filter(&txns, &view, date(2030, 1, 1)).len(), 1);
    }

    #[test]
    fn custom_view_is_inclusive_and_falls_back_to_all() {
        let txns = sample();
        let mut view = ViewState::default();
        view.set_custom_range(Some(date(2024, 1, 1)), Some(date(2024, 1, 1)))
            .unwrap();
        assert_eq!(FilterService::filter(&txns, &view, date(2024, 1, 5)).len(), 2);

        let unset = ViewState::new(ViewMode::Custom);
        assert_eq!(FilterService::filter(&txns, &unset, date(2024, 1, 5)).len(), 4);
    }

    #[test]
    fn sort_puts_latest_dates_first() {
        let txns = sample();
        let mut refs: Vec<&Transaction> = txns.iter().collect();
        FilterService::sort_newest_first(&mut refs);
        assert_eq!(refs[0].description, "c");
        assert_eq!(refs[3].description, "d");
    }
}
