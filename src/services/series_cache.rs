//! Per-ticker memoized pipeline results.
//!
//! Owns the ticker -> `TickerCacheEntry` map behind an async RwLock. An
//! entry is computed once per `(ticker, smoothing)` pair; a smoothing
//! change recomputes the derivative orders from the cached base series
//! without refetching, and eviction guarantees the next request starts
//! from a fresh fetch. Tickers with no data are cached as an empty
//! sentinel so repeated lookups never hit the provider again.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::constants::{DEFAULT_MAGNITUDE_CUTOFF, DEFAULT_MAX_EVENTS};
use crate::error::Result;
use crate::models::{derivatives, BaseSeries, PriceHistory, Series, SmoothingWindow, TimeWindow};
use crate::services::zero_crossing::{self, ZeroCrossing};

/// External market-data collaborator.
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Fetch the open/close history for `ticker` over `period`.
    ///
    /// An empty history means unknown or delisted ticker. A transport
    /// failure is terminal for the request; the cache treats it the same
    /// as "no data" and never retries internally.
    async fn fetch_history(&self, ticker: &str, period: TimeWindow) -> Result<PriceHistory>;
}

/// Derivative orders the dashboard can plot for one ticker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DerivativeOrder {
    /// Raw close/open prices
    Base,
    /// Momentum (first derivative)
    First,
    /// Acceleration (second derivative)
    Second,
}

/// Cached pipeline results for one ticker.
///
/// The entry exclusively owns its four series; the zero-crossing list is
/// derived from `second` and never outlives a recompute of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerCacheEntry {
    /// Raw close/open prices ("order 0")
    pub base: BaseSeries,

    /// Momentum series ("order 1")
    pub first: Series,

    /// Acceleration series ("order 2")
    pub second: Series,

    /// Momentum-reversal annotations derived from `second`
    pub zero_crossings: Vec<ZeroCrossing>,

    /// Which derivative orders the dashboard currently plots
    pub displayed_orders: Vec<DerivativeOrder>,

    smoothing_weeks: u32,
}

impl TickerCacheEntry {
    /// Sentinel for tickers with no data, cached so repeated lookups do
    /// not re-fetch.
    fn empty(smoothing: SmoothingWindow) -> Self {
        Self {
            base: BaseSeries::default(),
            first: Series::default(),
            second: Series::default(),
            zero_crossings: Vec::new(),
            displayed_orders: Vec::new(),
            smoothing_weeks: smoothing.weeks(),
        }
    }

    /// True when the ticker had no data for the fetch period
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    /// Smoothing parameter the entry was computed with
    pub fn smoothing_weeks(&self) -> u32 {
        self.smoothing_weeks
    }
}

/// Per-ticker memoized derivative pipeline.
///
/// Requests for distinct tickers run independently: the only shared state
/// is the key -> entry map, and the provider fetch happens outside the
/// map lock so one slow ticker cannot stall the others.
pub struct SeriesCache<S: HistorySource> {
    source: S,
    fetch_period: TimeWindow,
    entries: RwLock<HashMap<String, TickerCacheEntry>>,
}

impl<S: HistorySource> SeriesCache<S> {
    /// Cache fetching with the default period
    pub fn new(source: S) -> Self {
        Self::with_period(source, TimeWindow::default())
    }

    /// Cache fetching with an explicit period
    pub fn with_period(source: S, fetch_period: TimeWindow) -> Self {
        Self {
            source,
            fetch_period,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Full pipeline for `ticker`, memoized on `(ticker, smoothing)`.
    ///
    /// Absent tickers are fetched and run through
    /// base -> first -> second -> zero crossings. A present entry with the
    /// same smoothing is returned as-is. A smoothing change recomputes the
    /// derivative orders from the cached base without refetching. "No
    /// data" is never an error here: callers get the empty sentinel and
    /// decide what to render.
    pub async fn get_or_compute(
        &self,
        ticker: &str,
        smoothing: SmoothingWindow,
    ) -> TickerCacheEntry {
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(ticker) {
                if entry.smoothing_weeks == smoothing.weeks() {
                    debug!(ticker, "cache hit");
                    return entry.clone();
                }
            }
        }

        {
            let mut entries = self.entries.write().await;
            if let Some(entry) = entries.get_mut(ticker) {
                if entry.smoothing_weeks == smoothing.weeks() {
                    return entry.clone();
                }
                debug!(
                    ticker,
                    weeks = smoothing.weeks(),
                    "smoothing changed, recomputing derivatives"
                );
                let mut rebuilt = build_from_base(entry.base.clone(), smoothing);
                rebuilt.displayed_orders = entry.displayed_orders.clone();
                *entry = rebuilt;
                return entry.clone();
            }
        }

        // First sighting: fetch outside the lock so a slow provider does
        // not block requests for other tickers.
        let entry = self.fetch_entry(ticker, smoothing).await;

        let mut entries = self.entries.write().await;
        entries
            .entry(ticker.to_string())
            .or_insert(entry)
            .clone()
    }

    /// Remove the entry for `ticker`.
    ///
    /// The next request for it is a fresh fetch-and-compute; evicted data
    /// is never resurrected. Returns false if the ticker was not cached.
    pub async fn evict(&self, ticker: &str) -> bool {
        let removed = self.entries.write().await.remove(ticker).is_some();
        if removed {
            debug!(ticker, "evicted");
        }
        removed
    }

    /// Update which derivative orders the dashboard plots for `ticker`.
    ///
    /// Display selection alone never triggers recomputation; the cached
    /// series are re-sliced and re-selected as they are. Returns false for
    /// unknown tickers.
    pub async fn set_displayed_orders(&self, ticker: &str, orders: Vec<DerivativeOrder>) -> bool {
        let mut entries = self.entries.write().await;
        match entries.get_mut(ticker) {
            Some(entry) => {
                entry.displayed_orders = orders;
                true
            }
            None => false,
        }
    }

    /// Drop every entry whose ticker is no longer in the active set.
    ///
    /// The dashboard calls this after its ticker list changes so deleted
    /// tickers cannot come back from cache.
    pub async fn retain_tickers(&self, active: &[String]) {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|ticker, _| active.iter().any(|a| a == ticker));
        let dropped = before - entries.len();
        if dropped > 0 {
            debug!(dropped, "pruned inactive tickers");
        }
    }

    /// True when `ticker` has a cached entry
    pub async fn contains(&self, ticker: &str) -> bool {
        self.entries.read().await.contains_key(ticker)
    }

    /// Number of cached tickers
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// True when nothing is cached
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drop all cached entries
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    async fn fetch_entry(&self, ticker: &str, smoothing: SmoothingWindow) -> TickerCacheEntry {
        match self.source.fetch_history(ticker, self.fetch_period).await {
            Ok(history) => {
                info!(ticker, rows = history.len(), "fetched history");
                build_entry(&history, smoothing)
            }
            Err(err) => {
                warn!(ticker, error = %err, "history fetch failed, caching empty entry");
                TickerCacheEntry::empty(smoothing)
            }
        }
    }
}

/// Run base -> first -> second -> zero crossings for a fetched history.
fn build_entry(history: &PriceHistory, smoothing: SmoothingWindow) -> TickerCacheEntry {
    match derivatives::base(history) {
        Ok(base) => build_from_base(base, smoothing),
        Err(err) => {
            info!(ticker = %history.ticker, error = %err, "no chart data");
            TickerCacheEntry::empty(smoothing)
        }
    }
}

/// Derivative orders degrade to empty series when the offset exceeds the
/// available length; the caller still gets a usable entry.
fn build_from_base(base: BaseSeries, smoothing: SmoothingWindow) -> TickerCacheEntry {
    let first = derivatives::first_derivative(&base, smoothing).unwrap_or_else(|err| {
        debug!(error = %err, "first derivative unavailable");
        Series::default()
    });
    let second = if first.is_empty() {
        Series::default()
    } else {
        derivatives::second_derivative(&first, smoothing).unwrap_or_else(|err| {
            debug!(error = %err, "second derivative unavailable");
            Series::default()
        })
    };
    let zero_crossings =
        zero_crossing::detect(&second, None, DEFAULT_MAGNITUDE_CUTOFF, DEFAULT_MAX_EVENTS);

    TickerCacheEntry {
        base,
        first,
        second,
        zero_crossings,
        displayed_orders: Vec::new(),
        smoothing_weeks: smoothing.weeks(),
    }
}
