use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    DAYS_FIVE_YEARS, DAYS_ONE_MONTH, DAYS_ONE_WEEK, DAYS_ONE_YEAR, DAYS_THREE_MONTHS,
};

/// Date-range selector for chart display.
///
/// Doubles as the period argument of the external market-data source, which
/// accepts the same coarse ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeWindow {
    /// Entire available history, no slicing
    All,
    /// Last five years
    FiveYears,
    /// Last year
    OneYear,
    /// Last three months
    ThreeMonths,
    /// Last month
    OneMonth,
    /// Last week
    OneWeek,
}

impl TimeWindow {
    /// Window length in days; `None` for `All`
    pub fn days(&self) -> Option<i64> {
        match self {
            TimeWindow::All => None,
            TimeWindow::FiveYears => Some(DAYS_FIVE_YEARS),
            TimeWindow::OneYear => Some(DAYS_ONE_YEAR),
            TimeWindow::ThreeMonths => Some(DAYS_THREE_MONTHS),
            TimeWindow::OneMonth => Some(DAYS_ONE_MONTH),
            TimeWindow::OneWeek => Some(DAYS_ONE_WEEK),
        }
    }

    /// Cutoff timestamp relative to `now`; `None` means no slicing.
    pub fn cutoff_from(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.days().map(|days| now - Duration::days(days))
    }

    /// Cutoff timestamp relative to the current time
    pub fn cutoff(&self) -> Option<DateTime<Utc>> {
        self.cutoff_from(Utc::now())
    }

    /// Slider mark label used by the dashboard
    pub fn label(&self) -> &'static str {
        match self {
            TimeWindow::All => "All",
            TimeWindow::FiveYears => "5y",
            TimeWindow::OneYear => "1y",
            TimeWindow::ThreeMonths => "3mo",
            TimeWindow::OneMonth => "1mo",
            TimeWindow::OneWeek => "1w",
        }
    }

    /// Get all available windows
    pub fn all() -> Vec<TimeWindow> {
        vec![
            TimeWindow::All,
            TimeWindow::FiveYears,
            TimeWindow::OneYear,
            TimeWindow::ThreeMonths,
            TimeWindow::OneMonth,
            TimeWindow::OneWeek,
        ]
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        // Initial position of the dashboard's date-range slider
        TimeWindow::OneYear
    }
}
