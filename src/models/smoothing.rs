use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SMOOTHING_WEEKS, TRADING_DAYS_PER_WEEK};

/// User-chosen smoothing parameter in weeks.
///
/// Both derivative computations look back `offset()` trading-day rows; a
/// larger window smooths out day-to-day noise at the cost of lag. The
/// offset never drops below one step, even for zero weeks, so a derivative
/// is always computed against a strictly earlier row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SmoothingWindow {
    weeks: u32,
}

impl SmoothingWindow {
    /// Create a smoothing window from a week count
    pub fn new(weeks: u32) -> Self {
        Self { weeks }
    }

    /// Week count as entered by the user
    pub fn weeks(&self) -> u32 {
        self.weeks
    }

    /// Trading-day lag used by the finite-difference computations
    pub fn offset(&self) -> usize {
        (self.weeks as usize * TRADING_DAYS_PER_WEEK).max(1)
    }
}

impl Default for SmoothingWindow {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING_WEEKS)
    }
}

impl From<u32> for SmoothingWindow {
    fn from(weeks: u32) -> Self {
        Self::new(weeks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_floors_at_one() {
        assert_eq!(SmoothingWindow::new(0).offset(), 1);
    }

    #[test]
    fn test_offset_is_trading_days() {
        assert_eq!(SmoothingWindow::new(1).offset(), 5);
        assert_eq!(SmoothingWindow::new(4).offset(), 20);
    }

    #[test]
    fn test_default_weeks() {
        assert_eq!(SmoothingWindow::default().weeks(), 4);
    }
}
