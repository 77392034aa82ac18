// =============================================================================
// Market Data — fetch boundary for daily price series
// =============================================================================
//
// The scoring engine never talks to a provider. Callers fetch through a
// `MarketDataSource`, optionally wrapped in a `SeriesCache`, and hand the
// resulting series to the engine.

pub mod cache;
pub mod yahoo;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::PriceSeries;

pub use cache::SeriesCache;
pub use yahoo::YahooClient;

/// Trailing calendar window requested from a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LookbackWindow {
    pub days: u32,
}

impl LookbackWindow {
    pub fn days(days: u32) -> Self {
        Self { days }
    }
}

impl std::fmt::Display for LookbackWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d", self.days)
    }
}

/// Result of one fetch. A provider failure is data, not an error: the
/// caller decides whether the series was required.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Available(PriceSeries),
    Unavailable { symbol: String, reason: String },
}

/// Abstract interface for fetching daily series.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn fetch(&self, symbol: &str, window: LookbackWindow) -> FetchOutcome;

    /// Drop anything held locally so the next fetch reaches the provider.
    /// Returns the number of entries dropped.
    fn invalidate_all(&self) -> usize {
        0
    }
}
