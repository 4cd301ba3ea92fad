//! Month-over-month observations for the active category.

use chrono::NaiveDate;
use spendbook_domain::{Transaction, TransactionKind, YearMonth};
use tracing::debug;

use crate::summary_service::{percent, percent_change, SummaryService};

/// Threshold above which the savings rate counts as excellent.
const STRONG_SAVINGS_RATE: i64 = 30;
/// Minimum deviation from the 3-month average worth reporting.
const AVERAGE_DEVIATION: i64 = 20;
const PEAK_WINDOW_MONTHS: i32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightTone {
    Positive,
    Negative,
    Warning,
    Neutral,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Insight {
    /// `percent` is the magnitude of the change; `increased` carries the direction.
    ExpenseVsLastMonth { percent: i64, increased: bool, current: f64, difference: f64 },
    IncomeVsLastMonth { percent: i64, increased: bool, current: f64, difference: f64 },
    PeakExpenseMonth { month: YearMonth, amount: f64, is_current: bool },
    SavingsRate { percent: i64, saved: f64 },
    ExpenseVsAverage { percent: i64, average: f64 },
    NotEnoughData,
}

impl Insight {
    pub fn tone(&self) -> InsightTone {
        match self {
            Insight::ExpenseVsLastMonth { increased: true, .. } => InsightTone::Negative,
            Insight::ExpenseVsLastMonth { .. } => InsightTone::Positive,
            Insight::IncomeVsLastMonth { increased: true, .. } => InsightTone::Positive,
            Insight::IncomeVsLastMonth { .. } => InsightTone::Warning,
            Insight::PeakExpenseMonth { is_current: true, .. } => InsightTone::Warning,
            Insight::PeakExpenseMonth { .. } => InsightTone::Neutral,
            Insight::SavingsRate { percent, .. } if *percent > STRONG_SAVINGS_RATE => {
                InsightTone::Positive
            }
            Insight::SavingsRate { percent, .. } if *percent > 0 => InsightTone::Neutral,
            Insight::SavingsRate { .. } => InsightTone::Negative,
            Insight::ExpenseVsAverage { percent, .. } if *percent > 0 => InsightTone::Warning,
            Insight::ExpenseVsAverage { .. } => InsightTone::Positive,
            Insight::NotEnoughData => InsightTone::Neutral,
        }
    }

    pub fn headline(&self) -> String {
        match self {
            Insight::ExpenseVsLastMonth { percent, increased, .. } => {
                let direction = if *increased { "up" } else { "down" };
                format!("Spending {direction} {percent}% this month")
            }
            Insight::IncomeVsLastMonth { percent, increased, .. } => {
                let direction = if *increased { "up" } else { "down" };
                format!("Income {direction} {percent}% this month")
            }
            Insight::PeakExpenseMonth { is_current: true, .. } => {
                "Highest spending month!".to_string()
            }
            Insight::PeakExpenseMonth { month, .. } => {
                format!("Highest spending was {}", month.short_label())
            }
            Insight::SavingsRate { percent, .. } if *percent > STRONG_SAVINGS_RATE => {
                format!("{percent}% savings rate this month!")
            }
            Insight::SavingsRate { percent, .. } if *percent > 0 => {
                format!("{percent}% savings rate this month")
            }
            Insight::SavingsRate { .. } => "Spending exceeds income!".to_string(),
            Insight::ExpenseVsAverage { percent, .. } => {
                let side = if *percent > 0 { "above" } else { "below" };
                format!("{}% {side} 3-month average", percent.abs())
            }
            Insight::NotEnoughData => "Add more transactions to see insights".to_string(),
        }
    }

    /// Explanatory sentence; `money` renders amounts in the user's currency.
    pub fn detail<F: Fn(f64) -> String>(&self, money: F) -> String {
        match self {
            Insight::ExpenseVsLastMonth { increased: true, difference, .. } => {
                format!("You spent {} more than last month", money(*difference))
            }
            Insight::ExpenseVsLastMonth { difference, .. } => format!(
                "Great! You saved {} compared to last month",
                money(*difference)
            ),
            Insight::IncomeVsLastMonth { increased: true, difference, .. } => {
                format!("You earned {} more than last month", money(*difference))
            }
            Insight::IncomeVsLastMonth { difference, .. } => {
                format!("You earned {} less than last month", money(*difference))
            }
            Insight::PeakExpenseMonth { is_current: true, .. } => {
                "This is your highest expense month in the last 6 months".to_string()
            }
            Insight::PeakExpenseMonth { .. } => "Peak spending month in the last 6 months".to_string(),
            Insight::SavingsRate { percent, .. } if *percent > STRONG_SAVINGS_RATE => {
                "Excellent! You're saving more than 30% of your income".to_string()
            }
            Insight::SavingsRate { percent, .. } if *percent > 0 => {
                "You're saving money, keep it up!".to_string()
            }
            Insight::SavingsRate { .. } => "You're spending more than you earn this month".to_string(),
            Insight::ExpenseVsAverage { percent, .. } if *percent > 0 => {
                "Your spending is higher than your usual pattern".to_string()
            }
            Insight::ExpenseVsAverage { .. } => {
                "Great job keeping expenses under control!".to_string()
            }
            Insight::NotEnoughData => {
                "Track your income and expenses to get personalized insights".to_string()
            }
        }
    }

    /// Headline figure, if any.
    pub fn value<F: Fn(f64) -> String>(&self, money: F) -> Option<String> {
        match self {
            Insight::ExpenseVsLastMonth { current, .. }
            | Insight::IncomeVsLastMonth { current, .. } => Some(money(*current)),
            Insight::PeakExpenseMonth { amount, .. } => Some(money(*amount)),
            Insight::SavingsRate { saved, .. } if *saved < 0.0 => {
                Some(format!("-{}", money(saved.abs())))
            }
            Insight::SavingsRate { saved, .. } => Some(money(*saved)),
            Insight::ExpenseVsAverage { average, .. } => {
                Some(format!("Avg: {}", money(average.round())))
            }
            Insight::NotEnoughData => None,
        }
    }
}

pub struct InsightService;

impl InsightService {
    /// Builds every applicable insight for `transactions` relative to `today`'s month.
    /// Never returns an empty list.
    pub fn generate(transactions: &[&Transaction], today: NaiveDate) -> Vec<Insight> {
        let current = YearMonth::of(today);
        let previous = current.shift(-1);
        let month_total = |month: YearMonth, kind: TransactionKind| {
            SummaryService::total_where(transactions.iter().copied(), kind, |date| month.contains(date))
        };

        let current_expense = month_total(current, TransactionKind::Expense);
        let current_income = month_total(current, TransactionKind::Income);
        let last_expense = month_total(previous, TransactionKind::Expense);
        let last_income = month_total(previous, TransactionKind::Income);

        let mut insights = Vec::new();

        if let Some(change) = percent_change(current_expense, last_expense) {
            if current_expense != last_expense {
                insights.push(Insight::ExpenseVsLastMonth {
                    percent: change.abs(),
                    increased: current_expense > last_expense,
                    current: current_expense,
                    difference: (current_expense - last_expense).abs(),
                });
            }
        }

        if let Some(change) = percent_change(current_income, last_income) {
            if current_income != last_income {
                insights.push(Insight::IncomeVsLastMonth {
                    percent: change.abs(),
                    increased: current_income > last_income,
                    current: current_income,
                    difference: (current_income - last_income).abs(),
                });
            }
        }

        // Ties resolve to the most recent month.
        let mut peak: Option<(YearMonth, f64)> = None;
        for offset in 0..PEAK_WINDOW_MONTHS {
            let month = current.shift(-offset);
            let expense = month_total(month, TransactionKind::Expense);
            if expense > peak.map_or(0.0, |(_, best)| best) {
                peak = Some((month, expense));
            }
        }
        if let Some((month, amount)) = peak {
            insights.push(Insight::PeakExpenseMonth {
                month,
                amount,
                is_current: month == current,
            });
        }

        if current_income > 0.0 {
            let saved = current_income - current_expense;
            insights.push(Insight::SavingsRate {
                percent: percent(saved, current_income),
                saved,
            });
        }

        let average = (1..=3)
            .map(|offset| month_total(current.shift(-offset), TransactionKind::Expense))
            .sum::<f64>()
            / 3.0;
        if let Some(change) = percent_change(current_expense, average) {
            if change.abs() > AVERAGE_DEVIATION {
                insights.push(Insight::ExpenseVsAverage {
                    percent: change,
                    average,
                });
            }
        }

        if insights.is_empty() {
            insights.push(Insight::NotEnoughData);
        }
        debug!(count = insights.len(), month = %current, "generated insights");
        insights
    }
}
