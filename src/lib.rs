//! Core pipeline of an interactive stock-charting dashboard.
//!
//! Given a ticker, the pipeline fetches its open/close history through an
//! external market-data source, derives smoothed momentum ("first
//! derivative") and acceleration ("second derivative") series, annotates
//! momentum reversals as zero-crossing events, and memoizes the whole
//! result per ticker so the date-range slider re-slices cached series
//! instead of recomputing them.
//!
//! The crate deliberately has no network, file or HTTP surface of its own:
//! data retrieval sits behind [`HistorySource`], and rendering belongs to
//! the UI layer consuming [`TickerCacheEntry`].

pub mod constants;
pub mod error;
pub mod models;
pub mod services;

pub use error::{Error, Result};
pub use models::{BaseSeries, PriceHistory, PricePoint, Series, SmoothingWindow, TimeWindow};
pub use services::{
    DerivativeOrder, HistorySource, Polarity, SeriesCache, TickerCacheEntry, ZeroCrossing,
};
