//! View selection state: which period the summaries are scoped to.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::common::YearMonth;

/// Longest lookback `quick` accepts, roughly a century.
pub const MAX_QUICK_RANGE_DAYS: i64 = 36_500;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Daily,
    Monthly,
    Yearly,
    Custom,
    #[default]
    All,
}

impl ViewMode {
    pub const ALL: [ViewMode; 5] = [
        ViewMode::Daily,
        ViewMode::Monthly,
        ViewMode::Yearly,
        ViewMode::Custom,
        ViewMode::All,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Some(ViewMode::Daily),
            "monthly" | "month" => Some(ViewMode::Monthly),
            "yearly" | "year" => Some(ViewMode::Yearly),
            "custom" | "range" => Some(ViewMode::Custom),
            "all" => Some(ViewMode::All),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Daily => "daily",
            ViewMode::Monthly => "monthly",
            ViewMode::Yearly => "yearly",
            ViewMode::Custom => "custom",
            ViewMode::All => "all",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    MissingRangeBound,
    StartAfterEnd { start: NaiveDate, end: NaiveDate },
    QuickRangeOutOfBounds(i64),
    OutOfRange,
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewError::MissingRangeBound => f.write_str("please select both start and end dates"),
            ViewError::StartAfterEnd { start, end } => {
                write!(f, "start date {start} must be before end date {end}")
            }
            ViewError::QuickRangeOutOfBounds(days) => write!(
                f,
                "quick range must cover 0 to {MAX_QUICK_RANGE_DAYS} days (got {days})"
            ),
            ViewError::OutOfRange => f.write_str("that period is outside the supported calendar"),
        }
    }
}

impl std::error::Error for ViewError {}

/// Heading shown above a summary, e.g. `This Month's Summary` / `January 2024`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodLabel {
    pub title: String,
    pub detail: String,
}

/// Current view selection. Unset selectors fall back to `today`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub mode: ViewMode,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub month: Option<YearMonth>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub custom_start: Option<NaiveDate>,
    #[serde(default)]
    pub custom_end: Option<NaiveDate>,
}

impl ViewState {
    pub fn new(mode: ViewMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn selected_date(&self, today: NaiveDate) -> NaiveDate {
        self.date.unwrap_or(today)
    }

    pub fn selected_month(&self, today: NaiveDate) -> YearMonth {
        self.month.unwrap_or_else(|| YearMonth::of(today))
    }

    pub fn selected_year(&self, today: NaiveDate) -> i32 {
        self.year.unwrap_or_else(|| today.year())
    }

    /// Both bounds when the custom range is fully set.
    pub fn custom_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.custom_start.zip(self.custom_end)
    }

    /// Moves the selector of the current mode by `steps` periods.
    /// Custom and all views are left untouched, and so is the state on error.
    pub fn navigate(&mut self, steps: i32, today: NaiveDate) -> Result<(), ViewError> {
        match self.mode {
            ViewMode::Daily => {
                let date = self
                    .selected_date(today)
                    .checked_add_signed(Duration::days(i64::from(steps)))
                    .ok_or(ViewError::OutOfRange)?;
                self.date = Some(date);
            }
            ViewMode::Monthly => {
                let month = self
                    .selected_month(today)
                    .checked_shift(steps)
                    .ok_or(ViewError::OutOfRange)?;
                self.month = Some(month);
            }
            ViewMode::Yearly => {
                let year = self
                    .selected_year(today)
                    .checked_add(steps)
                    .filter(|year| NaiveDate::from_ymd_opt(*year, 1, 1).is_some())
                    .ok_or(ViewError::OutOfRange)?;
                self.year = Some(year);
            }
            ViewMode::Custom | ViewMode::All => {}
        }
        Ok(())
    }

    /// Resets to the all view with every selector pointing at `today`.
    pub fn go_to_current(&mut self, today: NaiveDate) {
        self.mode = ViewMode::All;
        self.custom_start = None;
        self.custom_end = None;
        self.date = Some(today);
        self.month = Some(YearMonth::of(today));
        self.year = Some(today.year());
    }

    /// Validates and applies an inclusive custom range. State is unchanged on error.
    pub fn set_custom_range(
        &mut self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<(), ViewError> {
        let (start, end) = start.zip(end).ok_or(ViewError::MissingRangeBound)?;
        if start > end {
            return Err(ViewError::StartAfterEnd { start, end });
        }
        self.custom_start = Some(start);
        self.custom_end = Some(end);
        self.mode = ViewMode::Custom;
        Ok(())
    }

    /// Custom range covering `[today - days, today]`.
    pub fn quick_range(&mut self, days: i64, today: NaiveDate) -> Result<(), ViewError> {
        if !(0..=MAX_QUICK_RANGE_DAYS).contains(&days) {
            return Err(ViewError::QuickRangeOutOfBounds(days));
        }
        let start = today
            .checked_sub_signed(Duration::days(days))
            .ok_or(ViewError::OutOfRange)?;
        self.set_custom_range(Some(start), Some(today))
    }

    pub fn period_label(&self, today: NaiveDate) -> PeriodLabel {
        let long_date = |date: NaiveDate| date.format("%A, %B %-d, %Y").to_string();
        let (title, detail) = match self.mode {
            ViewMode::All => ("All Transactions".to_string(), "Complete transaction history".to_string()),
            ViewMode::Custom => match self.custom_range() {
                Some((start, end)) if start == end => {
                    let title = if start == today { "Today's Summary" } else { "Daily Summary" };
                    (title.to_string(), long_date(start))
                }
                Some((start, end)) => (
                    "Custom Range".to_string(),
                    format!("{} - {}", start.format("%b %-d"), end.format("%b %-d, %Y")),
                ),
                None => ("Custom Range".to_string(), "Range not set, showing all".to_string()),
            },
            ViewMode::Daily => {
                let date = self.selected_date(today);
                let title = if date == today { "Today's Summary" } else { "Daily Summary" };
                (title.to_string(), long_date(date))
            }
            ViewMode::Monthly => {
                let month = self.selected_month(today);
                let title = if month == YearMonth::of(today) {
                    "This Month's Summary"
                } else {
                    "Monthly Summary"
                };
                (title.to_string(), month.first_day().format("%B %Y").to_string())
            }
            ViewMode::Yearly => {
                let year = self.selected_year(today);
                let title = if year == today.year() {
                    "This Year's Summary"
                } else {
                    "Yearly Summary"
                };
                (title.to_string(), format!("Year {year}"))
            }
        };
        PeriodLabel { title, detail }
    }
}
