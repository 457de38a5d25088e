mod price_history;
mod series;
mod smoothing;
mod time_window;
pub mod derivatives;

pub use price_history::{PriceHistory, PricePoint};
pub use series::{BaseSeries, Series};
pub use smoothing::SmoothingWindow;
pub use time_window::TimeWindow;
