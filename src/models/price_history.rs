use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Single open/close observation for one trading day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Timestamp of the data point
    #[serde(with = "chrono::serde::ts_seconds")]
    pub time: DateTime<Utc>,

    /// Opening price
    pub open: f64,

    /// Closing price
    pub close: f64,
}

impl PricePoint {
    /// Create a new price point
    pub fn new(time: DateTime<Utc>, open: f64, close: f64) -> Self {
        Self { time, open, close }
    }
}

/// Raw price history for one ticker as returned by the market-data source.
///
/// Timestamps are strictly increasing with no duplicates. The history is
/// immutable once produced; every derived series is computed from it, never
/// written back into it. An empty `points` list means the provider had no
/// data for the ticker and period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    /// Ticker symbol the rows belong to
    pub ticker: String,

    /// Ordered open/close rows
    pub points: Vec<PricePoint>,
}

impl PriceHistory {
    /// Create a history from already-ordered rows
    pub fn new(ticker: impl Into<String>, points: Vec<PricePoint>) -> Self {
        Self {
            ticker: ticker.into(),
            points,
        }
    }

    /// History with no rows (unknown or delisted ticker)
    pub fn empty(ticker: impl Into<String>) -> Self {
        Self::new(ticker, Vec::new())
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the provider returned no rows
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
