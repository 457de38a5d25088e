pub mod series_cache;
pub mod zero_crossing;

pub use series_cache::{DerivativeOrder, HistorySource, SeriesCache, TickerCacheEntry};
pub use zero_crossing::{Polarity, ZeroCrossing};
