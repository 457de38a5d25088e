use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::TimeWindow;

/// Value series aligned to timestamps (index-parallel arrays).
///
/// Timestamps are strictly increasing, which lets window slicing use a
/// binary search instead of a scan. Slicing produces a new series; cached
/// series are never mutated by display operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Timestamps, strictly increasing
    pub times: Vec<DateTime<Utc>>,

    /// Values, index-aligned with `times`
    pub values: Vec<f64>,
}

impl Series {
    /// Create a series from index-aligned arrays
    pub fn new(times: Vec<DateTime<Utc>>, values: Vec<f64>) -> Self {
        debug_assert_eq!(times.len(), values.len());
        Self { times, values }
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the series holds no points
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Suffix of the series with `time >= cutoff`; `None` keeps everything.
    pub fn slice_from(&self, cutoff: Option<DateTime<Utc>>) -> Series {
        match cutoff {
            None => self.clone(),
            Some(cutoff) => {
                let start = self.times.partition_point(|t| *t < cutoff);
                Series {
                    times: self.times[start..].to_vec(),
                    values: self.values[start..].to_vec(),
                }
            }
        }
    }

    /// Re-slice to the visible date-range window (pure, no recomputation)
    pub fn slice_to_window(&self, window: TimeWindow) -> Series {
        self.slice_from(window.cutoff())
    }
}

/// Base price series: the parallel (times, close, open) arrays extracted
/// from a raw history. This is what the derivative computations consume
/// and what the chart plots as "order 0".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseSeries {
    /// Timestamps, strictly increasing
    pub times: Vec<DateTime<Utc>>,

    /// Closing prices, index-aligned with `times`
    pub close: Vec<f64>,

    /// Opening prices, index-aligned with `times`
    pub open: Vec<f64>,
}

impl BaseSeries {
    /// Number of rows
    pub fn len(&self) -> usize {
        self.close.len()
    }

    /// True when the series holds no rows
    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    /// Suffix of the series with `time >= cutoff`; `None` keeps everything.
    pub fn slice_from(&self, cutoff: Option<DateTime<Utc>>) -> BaseSeries {
        match cutoff {
            None => self.clone(),
            Some(cutoff) => {
                let start = self.times.partition_point(|t| *t < cutoff);
                BaseSeries {
                    times: self.times[start..].to_vec(),
                    close: self.close[start..].to_vec(),
                    open: self.open[start..].to_vec(),
                }
            }
        }
    }

    /// Re-slice to the visible date-range window (pure, no recomputation)
    pub fn slice_to_window(&self, window: TimeWindow) -> BaseSeries {
        self.slice_from(window.cutoff())
    }
}
