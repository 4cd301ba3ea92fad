//! Chart series and comparison highlights per period granularity.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use spendbook_domain::{Transaction, TransactionKind, YearMonth};
use tracing::debug;

use crate::summary_service::percent_change;
use crate::{CoreError, CoreResult};

/// Widest daily window, one year of buckets plus a leap day.
pub const MAX_TREND_DAYS: u32 = 366;

const MONTHLY_WINDOW: i32 = 6;
const YEARLY_WINDOW: i32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendBucket {
    pub label: String,
    pub income: f64,
    pub expense: f64,
}

impl TrendBucket {
    pub fn savings(&self) -> f64 {
        self.income - self.expense
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrendHighlight {
    ExpenseVsPrevious { percent: i64, increased: bool, period: String },
    IncomeVsPrevious { percent: i64, increased: bool, period: String },
    PeakDay { label: String, amount: f64 },
    DailyAverage { amount: f64 },
    HighestExpenseMonth { label: String, amount: f64, is_current: bool },
    HighestIncomeMonth { label: String, amount: f64, is_current: bool },
    ExpenseStreak { increasing: bool },
    BestSavingsYear { label: String, amount: f64 },
    ExpenseVsLastYear { percent: i64, increased: bool },
    TotalSavings { amount: f64 },
    BestMonth { label: String, amount: f64 },
    AverageMonthlyExpense { amount: f64, months: usize },
}

impl TrendHighlight {
    pub fn describe<F: Fn(f64) -> String>(&self, money: F) -> String {
        let more_less = |up: bool| if up { "more" } else { "less" };
        match self {
            TrendHighlight::ExpenseVsPrevious { percent, increased, period } => {
                format!("{percent}% {} expenses vs {period}", more_less(*increased))
            }
            TrendHighlight::IncomeVsPrevious { percent, increased, period } => {
                format!("{percent}% {} income vs {period}", more_less(*increased))
            }
            TrendHighlight::PeakDay { label, amount } => {
                format!("{label} was your peak spending period ({})", money(*amount))
            }
            TrendHighlight::DailyAverage { amount } => {
                format!("Daily average expense: {}", money(amount.round()))
            }
            TrendHighlight::HighestExpenseMonth { is_current: true, .. } => {
                "This month has highest expenses!".to_string()
            }
            TrendHighlight::HighestExpenseMonth { label, amount, .. } => {
                format!("{label} had highest expenses ({})", money(*amount))
            }
            TrendHighlight::HighestIncomeMonth { is_current: true, .. } => {
                "This month has highest income!".to_string()
            }
            TrendHighlight::HighestIncomeMonth { label, amount, .. } => {
                format!("{label} had highest income ({})", money(*amount))
            }
            TrendHighlight::ExpenseStreak { increasing: true } => {
                "Expenses increasing for 3 months straight!".to_string()
            }
            TrendHighlight::ExpenseStreak { increasing: false } => {
                "Great! Expenses decreasing for 3 months!".to_string()
            }
            TrendHighlight::BestSavingsYear { label, amount } => {
                format!("{label} was your best savings year ({})", money(*amount))
            }
            TrendHighlight::ExpenseVsLastYear { percent, increased } => {
                format!("{percent}% {} expenses than last year", more_less(*increased))
            }
            TrendHighlight::TotalSavings { amount } => format!("Total savings: {}", money(*amount)),
            TrendHighlight::BestMonth { label, amount } => {
                format!("{label} was your best month ({} saved)", money(*amount))
            }
            TrendHighlight::AverageMonthlyExpense { amount, months } => format!(
                "Average monthly expense: {} ({months} months)",
                money(amount.round())
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trend {
    pub title: String,
    pub buckets: Vec<TrendBucket>,
    pub highlights: Vec<TrendHighlight>,
}

pub struct TrendService;

impl TrendService {
    /// One bucket per day for the `days` days ending `today`, compared with the
    /// `days` days before that. Zero is treated as one day.
    pub fn daily(transactions: &[&Transaction], days: u32, today: NaiveDate) -> CoreResult<Trend> {
        if days > MAX_TREND_DAYS {
            return Err(CoreError::Validation(format!(
                "trend covers at most {MAX_TREND_DAYS} days (got {days})"
            )));
        }
        let days = days.max(1);
        let span = i64::from(days);
        let day_at = |offset: i64| {
            today.checked_sub_signed(Duration::days(offset)).ok_or_else(|| {
                CoreError::Validation(format!("a {days}-day trend before {today} is out of range"))
            })
        };
        let per_day = totals_by(transactions, |date| date);

        let mut buckets = Vec::with_capacity(days as usize);
        for offset in (0..span).rev() {
            let date = day_at(offset)?;
            let (income, expense) = per_day.get(&date).copied().unwrap_or_default();
            buckets.push(TrendBucket {
                label: day_label(date, days),
                income,
                expense,
            });
        }

        let mut previous_income = 0.0;
        let mut previous_expense = 0.0;
        for offset in span..span * 2 {
            let (income, expense) = per_day.get(&day_at(offset)?).copied().unwrap_or_default();
            previous_income += income;
            previous_expense += expense;
        }
        let current_income: f64 = buckets.iter().map(|b| b.income).sum();
        let current_expense: f64 = buckets.iter().map(|b| b.expense).sum();

        let mut highlights = Vec::new();
        if let Some(change) = percent_change(current_expense, previous_expense) {
            highlights.push(TrendHighlight::ExpenseVsPrevious {
                percent: change.abs(),
                increased: current_expense > previous_expense,
                period: previous_period_name(days),
            });
        }
        if let Some(change) = percent_change(current_income, previous_income) {
            highlights.push(TrendHighlight::IncomeVsPrevious {
                percent: change.abs(),
                increased: current_income > previous_income,
                period: previous_period_name(days),
            });
        }
        if let Some(peak) = first_max(&buckets, |b| b.expense).filter(|b| b.expense > 0.0) {
            highlights.push(TrendHighlight::PeakDay {
                label: peak.label.clone(),
                amount: peak.expense,
            });
        }
        if days > 1 {
            let average = current_expense / f64::from(days);
            if average > 0.0 {
                highlights.push(TrendHighlight::DailyAverage { amount: average });
            }
        }

        debug!(days, buckets = buckets.len(), "built daily trend");
        Ok(Trend {
            title: daily_title(days),
            buckets,
            highlights,
        })
    }

    /// The six months ending with `today`'s month.
    pub fn monthly(transactions: &[&Transaction], today: NaiveDate) -> Trend {
        let current = YearMonth::of(today);
        let per_month = totals_by(transactions, YearMonth::of);
        let buckets: Vec<TrendBucket> = (0..MONTHLY_WINDOW)
            .rev()
            .map(|offset| {
                let month = current.shift(-offset);
                let (income, expense) = per_month.get(&month).copied().unwrap_or_default();
                TrendBucket {
                    label: month.first_day().format("%b").to_string(),
                    income,
                    expense,
                }
            })
            .collect();

        let mut highlights = Vec::new();
        let last = buckets.len() - 1;
        if let Some((index, bucket)) = first_max_indexed(&buckets, |b| b.expense) {
            if bucket.expense > 0.0 {
                highlights.push(TrendHighlight::HighestExpenseMonth {
                    label: bucket.label.clone(),
                    amount: bucket.expense,
                    is_current: index == last,
                });
            }
        }
        if let Some((index, bucket)) = first_max_indexed(&buckets, |b| b.income) {
            if bucket.income > 0.0 {
                highlights.push(TrendHighlight::HighestIncomeMonth {
                    label: bucket.label.clone(),
                    amount: bucket.income,
                    is_current: index == last,
                });
            }
        }
        let tail: Vec<f64> = buckets[last - 2..].iter().map(|b| b.expense).collect();
        if tail[2] > tail[1] && tail[1] > tail[0] {
            highlights.push(TrendHighlight::ExpenseStreak { increasing: true });
        } else if tail[2] < tail[1] && tail[1] < tail[0] {
            highlights.push(TrendHighlight::ExpenseStreak { increasing: false });
        }

        Trend {
            title: "Last 6 Months Comparison".to_string(),
            buckets,
            highlights,
        }
    }

    /// The five years ending with `today`'s year.
    pub fn yearly(transactions: &[&Transaction], today: NaiveDate) -> Trend {
        let per_year = totals_by(transactions, |date| date.year());
        let buckets: Vec<TrendBucket> = (0..YEARLY_WINDOW)
            .rev()
            .map(|offset| {
                let year = today.year() - offset;
                let (income, expense) = per_year.get(&year).copied().unwrap_or_default();
                TrendBucket {
                    label: year.to_string(),
                    income,
                    expense,
                }
            })
            .collect();

        let mut highlights = Vec::new();
        if let Some(best) = first_max(&buckets, TrendBucket::savings).filter(|b| b.savings() > 0.0) {
            highlights.push(TrendHighlight::BestSavingsYear {
                label: best.label.clone(),
                amount: best.savings(),
            });
        }
        let this_year = buckets[buckets.len() - 1].expense;
        let last_year = buckets[buckets.len() - 2].expense;
        if this_year > 0.0 && last_year > 0.0 {
            if let Some(change) = percent_change(this_year, last_year) {
                highlights.push(TrendHighlight::ExpenseVsLastYear {
                    percent: change.abs(),
                    increased: this_year > last_year,
                });
            }
        }

        Trend {
            title: "Last 5 Years Comparison".to_string(),
            buckets,
            highlights,
        }
    }

    /// One bucket per month that has data, oldest first.
    pub fn all_time(transactions: &[&Transaction]) -> Trend {
        let per_month = totals_by(transactions, YearMonth::of);
        let buckets: Vec<TrendBucket> = per_month
            .iter()
            .map(|(month, (income, expense))| TrendBucket {
                label: month.first_day().format("%b %y").to_string(),
                income: *income,
                expense: *expense,
            })
            .collect();

        let mut highlights = Vec::new();
        let total_income: f64 = buckets.iter().map(|b| b.income).sum();
        let total_expense: f64 = buckets.iter().map(|b| b.expense).sum();
        let total_savings = total_income - total_expense;
        if total_savings > 0.0 {
            highlights.push(TrendHighlight::TotalSavings {
                amount: total_savings,
            });
        }
        if let Some(best) = first_max(&buckets, TrendBucket::savings).filter(|b| b.savings() > 0.0) {
            highlights.push(TrendHighlight::BestMonth {
                label: best.label.clone(),
                amount: best.savings(),
            });
        }
        let months = buckets.iter().filter(|b| b.expense > 0.0).count();
        if months > 0 {
            highlights.push(TrendHighlight::AverageMonthlyExpense {
                amount: total_expense / months as f64,
                months,
            });
        }

        Trend {
            title: "All-Time Summary".to_string(),
            buckets,
            highlights,
        }
    }
}

/// Income and expense totals grouped by `key`.
fn totals_by<K, F>(transactions: &[&Transaction], key: F) -> BTreeMap<K, (f64, f64)>
where
    K: Ord,
    F: Fn(NaiveDate) -> K,
{
    let mut totals: BTreeMap<K, (f64, f64)> = BTreeMap::new();
    for txn in transactions {
        let entry = totals.entry(key(txn.date)).or_default();
        match txn.kind {
            TransactionKind::Income => entry.0 += txn.amount,
            TransactionKind::Expense => entry.1 += txn.amount,
        }
    }
    totals
}

fn first_max_indexed<F>(buckets: &[TrendBucket], value: F) -> Option<(usize, &TrendBucket)>
where
    F: Fn(&TrendBucket) -> f64,
{
    let mut best: Option<(usize, &TrendBucket)> = None;
    for (index, bucket) in buckets.iter().enumerate() {
        match best {
            Some((_, current)) if value(bucket) <= value(current) => {}
            _ => best = Some((index, bucket)),
        }
    }
    best
}

fn first_max<F>(buckets: &[TrendBucket], value: F) -> Option<&TrendBucket>
where
    F: Fn(&TrendBucket) -> f64,
{
    first_max_indexed(buckets, value).map(|(_, bucket)| bucket)
}

fn day_label(date: NaiveDate, days: u32) -> String {
    match days {
        1 => "Today".to_string(),
        2..=7 => date.format("%a %-d").to_string(),
        _ => date.format("%b %-d").to_string(),
    }
}

fn daily_title(days: u32) -> String {
    match days {
        1 => "Today's Activity".to_string(),
        7 => "Last 7 Days Daily Breakdown".to_string(),
        30 => "Last 30 Days Daily Analysis".to_string(),
        90 => "Last 3 Months Overview".to_string(),
        180 => "Last 6 Months Analysis".to_string(),
        365 => "Last Year Overview".to_string(),
        other => format!("Last {other} Days Analysis"),
    }
}

fn previous_period_name(days: u32) -> String {
    match days {
        1 => "yesterday".to_string(),
        7 => "previous week".to_string(),
        30 => "previous month".to_string(),
        90 => "previous 3 months".to_string(),
        other => format!("previous {other} days"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn txn(amount: f64, kind: TransactionKind, on: NaiveDate) -> Transaction {
        Transaction::new("t", amount, kind, on)
    }

    #[test]
    fn daily_window_compares_with_preceding_window() {
        let today = date(2024, 3, 14);
        let txns = vec![
            txn(200.0, TransactionKind::Expense, date(2024, 3, 14)),
            txn(100.0, TransactionKind::Expense, date(2024, 3, 10)),
            txn(100.0, TransactionKind::Expense, date(2024, 3, 5)),
        ];
        let refs: Vec<&Transaction> = txns.iter().collect();
        let trend = TrendService::daily(&refs, 7, today).unwrap();

        assert_eq!(trend.title, "Last 7 Days Daily Breakdown");
        assert_eq!(trend.buckets.len(), 7);
        assert_eq!(trend.buckets[6].expense, 200.0);
        assert_eq!(
            trend.highlights[0],
            TrendHighlight::ExpenseVsPrevious {
                percent: 200,
                increased: true,
                period: "previous week".into()
            }
        );
        assert!(trend
            .highlights
            .iter()
            .any(|h| matches!(h, TrendHighlight::PeakDay { amount, .. } if *amount == 200.0)));
        let average = trend
            .highlights
            .iter()
            .find_map(|h| match h {
                TrendHighlight::DailyAverage { amount } => Some(*amount),
                _ => None,
            })
            .expect("daily average");
        assert!((average - 300.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn monthly_trend_detects_streaks_and_peaks() {
        let today = date(2024, 6, 10);
        let txns = vec![
            txn(100.0, TransactionKind::Expense, date(2024, 4, 1)),
            txn(200.0, TransactionKind::Expense, date(2024, 5, 1)),
            txn(300.0, TransactionKind::Expense, date(2024, 6, 1)),
            txn(900.0, TransactionKind::Income, date(2024, 2, 1)),
        ];
        let refs: Vec<&Transaction> = txns.iter().collect();
        let trend = TrendService::monthly(&refs, today);

        assert_eq!(trend.buckets.len(), 6);
        assert_eq!(trend.buckets[0].label, "Jan");
        assert!(trend
            .highlights
            .contains(&TrendHighlight::ExpenseStreak { increasing: true }));
        let money = |v: f64| format!("{v}");
        let texts: Vec<String> = trend.highlights.iter().map(|h| h.describe(money)).collect();
        assert!(texts.contains(&"This month has highest expenses!".to_string()));
        assert!(texts.contains(&"Feb had highest income (900)".to_string()));
    }

    #[test]
    fn yearly_trend_reports_best_year_and_change() {
        let today = date(2024, 6, 10);
        let txns = vec![
            txn(1000.0, TransactionKind::Income, date(2022, 1, 1)),
            txn(100.0, TransactionKind::Expense, date(2023, 1, 1)),
            txn(150.0, TransactionKind::Expense, date(2024, 1, 1)),
        ];
        let refs: Vec<&Transaction> = txns.iter().collect();
        let trend = TrendService::yearly(&refs, today);
        assert_eq!(trend.buckets.first().map(|b| b.label.as_str()), Some("2020"));
        assert!(trend.highlights.contains(&TrendHighlight::BestSavingsYear {
            label: "2022".into(),
            amount: 1000.0
        }));
        assert!(trend.highlights.contains(&TrendHighlight::ExpenseVsLastYear {
            percent: 50,
            increased: true
        }));
    }

    #[test]
    fn all_time_buckets_follow_data_months() {
        let txns = vec![
            txn(50.0, TransactionKind::Expense, date(2024, 3, 1)),
            txn(500.0, TransactionKind::Income, date(2023, 11, 1)),
            txn(100.0, TransactionKind::Expense, date(2023, 11, 3)),
        ];
        let refs: Vec<&Transaction> = txns.iter().collect();
        let trend = TrendService::all_time(&refs);
        let labels: Vec<&str> = trend.buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Nov 23", "Mar 24"]);
        assert!(trend.highlights.contains(&TrendHighlight::TotalSavings { amount: 350.0 }));
        assert!(trend.highlights.contains(&TrendHighlight::AverageMonthlyExpense {
            amount: 75.0,
            months: 2
        }));
    }

    #[test]
    fn daily_window_is_bounded() {
        let today = date(2024, 3, 14);
        let err = TrendService::daily(&[], 97_000_000, today).unwrap_err();
        assert!(err.is_validation());

        let widest = TrendService::daily(&[], MAX_TREND_DAYS, today).unwrap();
        assert_eq!(widest.buckets.len(), MAX_TREND_DAYS as usize);

        let err = TrendService::daily(&[], 7, NaiveDate::MIN).unwrap_err();
        assert!(err.is_validation());
    }
}
