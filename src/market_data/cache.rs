// =============================================================================
// Series Cache — TTL cache keyed by (symbol, window)
// =============================================================================
//
// Wraps any `MarketDataSource` and is itself one, so callers cannot tell
// whether a series came from the provider or from memory. Only available
// series are cached; an unavailable result is retried on the next call.
// =============================================================================

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info};

use super::{FetchOutcome, LookbackWindow, MarketDataSource};
use crate::types::PriceSeries;

/// Composite key that identifies a cached series.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct CacheKey {
    pub symbol: String,
    pub window: LookbackWindow,
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.symbol, self.window)
    }
}

struct CachedEntry {
    series: PriceSeries,
    fetched_at: Instant,
}

pub struct SeriesCache<S> {
    source: S,
    ttl: Duration,
    entries: RwLock<HashMap<CacheKey, CachedEntry>>,
}

impl<S: MarketDataSource> SeriesCache<S> {
    pub fn new(source: S, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Fresh cached series for `key`, if any.
    fn lookup(&self, key: &CacheKey) -> Option<PriceSeries> {
        let entries = self.entries.read();
        let entry = entries.get(key)?;
        if entry.fetched_at.elapsed() < self.ttl {
            Some(entry.series.clone())
        } else {
            None
        }
    }

    /// Number of stored entries, fresh or stale.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl<S: MarketDataSource> MarketDataSource for SeriesCache<S> {
    async fn fetch(&self, symbol: &str, window: LookbackWindow) -> FetchOutcome {
        let key = CacheKey {
            symbol: symbol.to_string(),
            window,
        };

        if let Some(series) = self.lookup(&key) {
            debug!(key = %key, "series cache hit");
            return FetchOutcome::Available(series);
        }

        debug!(key = %key, "series cache miss");
        let outcome = self.source.fetch(symbol, window).await;

        if let FetchOutcome::Available(series) = &outcome {
            self.entries.write().insert(
                key,
                CachedEntry {
                    series: series.clone(),
                    fetched_at: Instant::now(),
                },
            );
        }
        outcome
    }

    fn invalidate_all(&self) -> usize {
        let mut entries = self.entries.write();
        let dropped = entries.len();
        entries.clear();
        info!(dropped, "series cache cleared");
        dropped
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::types::test_support::flat;

    /// In-memory source that counts provider calls.
    pub(crate) struct StubSource {
        pub series: HashMap<String, PriceSeries>,
        pub calls: AtomicUsize,
    }

    impl StubSource {
        pub fn new(series: Vec<PriceSeries>) -> Self {
            Self {
                series: series.into_iter().map(|s| (s.symbol.clone(), s)).collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl MarketDataSource for StubSource {
        async fn fetch(&self, symbol: &str, _window: LookbackWindow) -> FetchOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.series.get(symbol) {
                Some(s) => FetchOutcome::Available(s.clone()),
                None => FetchOutcome::Unavailable {
                    symbol: symbol.to_string(),
                    reason: "not stubbed".to_string(),
                },
            }
        }
    }

    #[tokio::test]
    async fn second_fetch_within_ttl_hits_cache() {
        let cache = SeriesCache::new(
            StubSource::new(vec![flat("HG=F", 30, 4.0)]),
            Duration::from_secs(3600),
        );
        let window = LookbackWindow::days(60);

        let a = cache.fetch("HG=F", window).await;
        let b = cache.fetch("HG=F", window).await;
        assert_eq!(a, b);
        assert_eq!(cache.source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn expired_entry_is_refetched() {
        let cache = SeriesCache::new(
            StubSource::new(vec![flat("HG=F", 30, 4.0)]),
            Duration::ZERO,
        );
        let window = LookbackWindow::days(60);
        cache.fetch("HG=F", window).await;
        cache.fetch("HG=F", window).await;
        assert_eq!(cache.source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn window_is_part_of_the_key() {
        let cache = SeriesCache::new(
            StubSource::new(vec![flat("HG=F", 30, 4.0)]),
            Duration::from_secs(3600),
        );
        cache.fetch("HG=F", LookbackWindow::days(40)).await;
        cache.fetch("HG=F", LookbackWindow::days(60)).await;
        assert_eq!(cache.source.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn invalidate_all_forces_refetch() {
        let cache = SeriesCache::new(
            StubSource::new(vec![flat("HG=F", 30, 4.0), flat("^TNX", 30, 4.2)]),
            Duration::from_secs(3600),
        );
        let window = LookbackWindow::days(60);
        cache.fetch("HG=F", window).await;
        cache.fetch("^TNX", window).await;
        assert_eq!(cache.invalidate_all(), 2);
        assert!(cache.is_empty());
        cache.fetch("HG=F", window).await;
        assert_eq!(cache.source.calls.load(Ordering::SeqCst), 3);
        assert_eq!(cache.invalidate_all(), 1);
    }

    #[tokio::test]
    async fn unavailable_is_not_cached() {
        let cache = SeriesCache::new(StubSource::new(vec![]), Duration::from_secs(3600));
        let window = LookbackWindow::days(60);
        let outcome = cache.fetch("^NSEI", window).await;
        assert!(matches!(outcome, FetchOutcome::Unavailable { .. }));
        cache.fetch("^NSEI", window).await;
        assert_eq!(cache.source.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 0);
    }
}
