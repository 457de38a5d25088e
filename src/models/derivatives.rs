//! Finite-difference derivative routines for price series.
//!
//! The "first derivative" plotted by the dashboard is the relative return
//! between the open `offset` trading days back and the close at each row,
//! not a true mathematical derivative. The "second derivative" is the
//! absolute change of the first over the same offset applied to its own
//! index. Both shrink the series by `offset` rows and stay aligned to the
//! later timestamp.

use tracing::warn;

use crate::error::{Error, Result};
use crate::models::{BaseSeries, PriceHistory, Series, SmoothingWindow};

/// Extract the parallel (times, close, open) arrays from a raw history.
///
/// # Returns
/// * The base series the chart plots as "order 0"
/// * `EmptyHistory` when the provider returned no rows (unknown ticker or
///   no data for the period)
pub fn base(history: &PriceHistory) -> Result<BaseSeries> {
    if history.is_empty() {
        return Err(Error::EmptyHistory(history.ticker.clone()));
    }

    let mut times = Vec::with_capacity(history.len());
    let mut close = Vec::with_capacity(history.len());
    let mut open = Vec::with_capacity(history.len());
    for point in &history.points {
        times.push(point.time);
        close.push(point.close);
        open.push(point.open);
    }

    Ok(BaseSeries { times, close, open })
}

/// Relative price change over the smoothing offset.
///
/// Output index `i` holds `(close[offset + i] - open[i]) / open[i]` and is
/// aligned to `times[offset + i]`. Rows with a zero opening price are
/// masked (skipped with a warning): a zero open is anomalous provider data
/// but not a reason to drop the whole series.
///
/// # Returns
/// * Series of length `len - offset` (minus any masked rows)
/// * `InsufficientData` when the offset leaves no output rows
pub fn first_derivative(base: &BaseSeries, smoothing: SmoothingWindow) -> Result<Series> {
    let offset = smoothing.offset();
    let len = base.len();
    if offset >= len {
        return Err(Error::InsufficientData { offset, len });
    }

    let mut times = Vec::with_capacity(len - offset);
    let mut values = Vec::with_capacity(len - offset);
    for i in 0..len - offset {
        let open = base.open[i];
        if open == 0.0 {
            warn!(index = i, "zero opening price, masking element");
            continue;
        }
        times.push(base.times[offset + i]);
        values.push((base.close[offset + i] - open) / open);
    }

    Ok(Series { times, values })
}

/// Absolute change of the first-derivative series over the smoothing offset.
///
/// Output index `i` holds `values[offset + i] - values[i]` aligned to
/// `times[offset + i]`. Unlike the first derivative this is a plain
/// difference, not a relative one.
///
/// # Returns
/// * Series of length `len - offset`
/// * `InsufficientData` when the offset leaves no output rows
pub fn second_derivative(first: &Series, smoothing: SmoothingWindow) -> Result<Series> {
    let offset = smoothing.offset();
    let len = first.len();
    if offset >= len {
        return Err(Error::InsufficientData { offset, len });
    }

    let times = first.times[offset..].to_vec();
    let values = (0..len - offset)
        .map(|i| first.values[offset + i] - first.values[i])
        .collect();

    Ok(Series { times, values })
}

/// Trailing cumulative-sum moving average.
///
/// A window of zero is the identity. For `0 < window <= len` the output has
/// `len - window + 1` elements; a window longer than the input produces an
/// empty result.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 {
        return values.to_vec();
    }
    if window > values.len() {
        return Vec::new();
    }

    let mut cumsum = vec![0.0; values.len() + 1];
    for (i, v) in values.iter().enumerate() {
        cumsum[i + 1] = cumsum[i] + v;
    }

    (window..cumsum.len())
        .map(|i| (cumsum[i] - cumsum[i - window]) / window as f64)
        .collect()
}
