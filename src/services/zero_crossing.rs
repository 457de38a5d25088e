//! Zero-crossing detection over derivative series.
//!
//! A sign change between consecutive values of the acceleration series is
//! treated as a momentum-reversal event and annotated on the chart as a
//! rising (green, up arrow) or falling (red, down arrow) marker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Series, TimeWindow};

/// Direction of a detected sign change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    /// Acceleration turned positive (rendered green, arrow up)
    Rising,
    /// Acceleration turned negative (rendered red, arrow down)
    Falling,
}

/// One sign-change event in a derivative series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZeroCrossing {
    /// Timestamp of the later of the two points forming the crossing
    #[serde(with = "chrono::serde::ts_seconds")]
    pub time: DateTime<Utc>,

    /// Signed magnitude of the crossing, normalized into roughly [-1, 1]
    pub magnitude: f64,

    /// Rising or falling, derived from the sign of `magnitude`
    pub polarity: Polarity,
}

/// Scan a series for sign changes and produce annotation events.
///
/// `time_cutoff` restricts detection to the suffix with `time >= cutoff`
/// (only events inside the visible window get annotated). Events with
/// |normalized magnitude| below `magnitude_cutoff` are dropped, and at most
/// `max_events` events survive, keeping the largest magnitudes. The result
/// is ordered by timestamp ascending.
///
/// A degenerate magnitude range (all crossing magnitudes equal, including
/// the single-crossing case) yields no events rather than an error.
pub fn detect(
    series: &Series,
    time_cutoff: Option<DateTime<Utc>>,
    magnitude_cutoff: f64,
    max_events: usize,
) -> Vec<ZeroCrossing> {
    let sliced = series.slice_from(time_cutoff);
    if sliced.is_empty() {
        return Vec::new();
    }

    let mut crossings: Vec<(DateTime<Utc>, f64)> = Vec::new();
    for i in 0..sliced.len() - 1 {
        let was_positive = sliced.values[i] > 0.0;
        let is_positive = sliced.values[i + 1] > 0.0;
        if was_positive != is_positive {
            crossings.push((sliced.times[i + 1], sliced.values[i + 1] - sliced.values[i]));
        }
    }
    if crossings.is_empty() {
        return Vec::new();
    }

    let normalized = match normalize_magnitudes(&crossings) {
        Ok(normalized) => normalized,
        Err(err) => {
            debug!(error = %err, "treating as zero events");
            return Vec::new();
        }
    };

    let mut events: Vec<ZeroCrossing> = crossings
        .iter()
        .zip(normalized)
        .filter(|(_, magnitude)| magnitude.abs() >= magnitude_cutoff)
        .map(|(&(time, _), magnitude)| ZeroCrossing {
            time,
            magnitude,
            polarity: if magnitude > 0.0 {
                Polarity::Rising
            } else {
                Polarity::Falling
            },
        })
        .collect();

    if events.len() > max_events {
        if max_events == 0 {
            return Vec::new();
        }
        // Partial selection of the largest magnitudes, then restore time order.
        events.select_nth_unstable_by(max_events - 1, |a, b| {
            b.magnitude.abs().total_cmp(&a.magnitude.abs())
        });
        events.truncate(max_events);
        events.sort_by_key(|event| event.time);
    }

    events
}

/// Detect crossings restricted to the visible date-range window.
pub fn detect_in_window(
    series: &Series,
    window: TimeWindow,
    magnitude_cutoff: f64,
    max_events: usize,
) -> Vec<ZeroCrossing> {
    detect(series, window.cutoff(), magnitude_cutoff, max_events)
}

/// The scalar `min / (max - min)` is subtracted from every magnitude
/// before the shift into [-1, 1]. This is NOT min-max rescaling; every
/// annotation magnitude the dashboard shows depends on this exact formula.
/// See DESIGN.md before changing it.
fn normalize_magnitudes(crossings: &[(DateTime<Utc>, f64)]) -> Result<Vec<f64>> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &(_, magnitude) in crossings {
        min = min.min(magnitude);
        max = max.max(magnitude);
    }
    if max == min {
        return Err(Error::DegenerateMagnitudeRange);
    }

    let shift = min / (max - min);
    Ok(crossings
        .iter()
        .map(|&(_, magnitude)| (magnitude - shift - 0.5) * 2.0)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn daily_series(values: &[f64]) -> Series {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Series::new(
            (0..values.len())
                .map(|i| start + Duration::days(i as i64))
                .collect(),
            values.to_vec(),
        )
    }

    #[test]
    fn test_detects_crossings_in_acceleration_series() {
        // Second derivative of the close=[10,11,9,12,15,8] / open=10 history
        let series = daily_series(&[-0.2, 0.3, 0.3, -0.7]);

        let events = detect(&series, None, 0.05, 25);
        assert_eq!(events.len(), 2);

        // Sign sequence -,+,+,- crosses at indices 1 and 3
        assert_eq!(events[0].time, series.times[1]);
        assert_eq!(events[0].polarity, Polarity::Rising);
        assert!((events[0].magnitude - 4.0 / 3.0).abs() < 1e-9);

        assert_eq!(events[1].time, series.times[3]);
        assert_eq!(events[1].polarity, Polarity::Falling);
        assert!((events[1].magnitude + 5.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_crossings_no_events() {
        let series = daily_series(&[0.1, 0.2, 0.3, 0.4]);
        assert!(detect(&series, None, 0.05, 25).is_empty());
    }

    #[test]
    fn test_empty_series_no_events() {
        assert!(detect(&Series::default(), None, 0.05, 25).is_empty());
    }

    #[test]
    fn test_single_crossing_is_degenerate() {
        // One crossing means min == max, which the normalization cannot
        // handle; the detector reports no events instead of failing.
        let series = daily_series(&[1.0, -1.0]);
        assert!(detect(&series, None, 0.05, 25).is_empty());
    }

    #[test]
    fn test_time_cutoff_restricts_detection() {
        let series = daily_series(&[1.0, -1.0, 2.0, -4.0, 3.0]);

        let all = detect(&series, None, 0.05, 25);
        assert_eq!(all.len(), 4);

        let cutoff = series.times[1];
        let windowed = detect(&series, Some(cutoff), 0.05, 25);
        assert_eq!(windowed.len(), 3);
        assert!(windowed.iter().all(|e| e.time >= cutoff));
    }

    #[test]
    fn test_cutoff_past_end_yields_empty() {
        let series = daily_series(&[1.0, -1.0, 2.0, -4.0]);
        let cutoff = series.times[3] + Duration::days(1);
        assert!(detect(&series, Some(cutoff), 0.05, 25).is_empty());
    }

    #[test]
    fn test_magnitude_cutoff_is_monotone() {
        let series = daily_series(&[1.0, -1.0, 2.0, -4.0]);

        // Normalized magnitudes are about -3.67, 6.33 and -11.67
        let mut previous = usize::MAX;
        for cutoff in [0.0, 4.0, 7.0, 12.0] {
            let count = detect(&series, None, cutoff, 25).len();
            assert!(count <= previous);
            previous = count;
        }
        assert_eq!(detect(&series, None, 4.0, 25).len(), 2);
        assert_eq!(detect(&series, None, 12.0, 25).len(), 0);
    }

    #[test]
    fn test_max_events_keeps_largest_magnitudes() {
        let series = daily_series(&[1.0, -1.0, 2.0, -4.0]);

        let capped = detect(&series, None, 0.05, 1);
        assert_eq!(capped.len(), 1);
        // The crossing at index 3 has the largest |normalized magnitude|
        assert_eq!(capped[0].time, series.times[3]);
        assert_eq!(capped[0].polarity, Polarity::Falling);
    }

    #[test]
    fn test_max_events_one_of_two_crossings() {
        let series = daily_series(&[2.0, -1.0, 3.0]);

        let events = detect(&series, None, 0.05, 25);
        assert_eq!(events.len(), 2);

        let capped = detect(&series, None, 0.05, 1);
        assert_eq!(capped.len(), 1);
        assert_eq!(capped[0].time, series.times[2]);
        assert_eq!(capped[0].polarity, Polarity::Rising);
    }

    #[test]
    fn test_capped_output_stays_time_ordered() {
        let series = daily_series(&[1.0, -1.0, 2.0, -4.0, 3.0, -9.0]);

        let events = detect(&series, None, 0.0, 3);
        assert_eq!(events.len(), 3);
        assert!(events.windows(2).all(|pair| pair[0].time < pair[1].time));
    }

    #[test]
    fn test_never_exceeds_max_events() {
        let values: Vec<f64> = (0..40)
            .map(|i| if i % 2 == 0 { 1.0 + i as f64 } else { -1.0 - i as f64 })
            .collect();
        let series = daily_series(&values);

        assert!(detect(&series, None, 0.0, 5).len() <= 5);
        assert!(detect(&series, None, 0.0, 25).len() <= 25);
    }
}
