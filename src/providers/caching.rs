use crate::core::cache::Cache;
use crate::core::currency::{CurrencyCode, RateProvider, RateSnapshot};
use crate::core::error::ConverterError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Memoizes snapshots per base currency for a bounded time.
///
/// Only successful fetches are stored, so a failed call is retried by the
/// next user action rather than replayed from the cache.
pub struct CachingRateProvider<T: RateProvider> {
    inner: T,
    cache: Arc<dyn Cache<CurrencyCode, RateSnapshot>>,
    ttl: Duration,
}

impl<T: RateProvider> CachingRateProvider<T> {
    pub fn new(inner: T, cache: Arc<dyn Cache<CurrencyCode, RateSnapshot>>, ttl: Duration) -> Self {
        Self { inner, cache, ttl }
    }
}

#[async_trait]
impl<T: RateProvider> RateProvider for CachingRateProvider<T> {
    async fn fetch_rates(&self, base: CurrencyCode) -> Result<RateSnapshot, ConverterError> {
        if let Some(snapshot) = self.cache.get(&base).await {
            debug!(
                age_secs = snapshot.age().num_seconds(),
                "Cache hit for rates: {}", base
            );
            return Ok(snapshot);
        }
        debug!("Cache miss for rates: {}", base);

        let snapshot = self.inner.fetch_rates(base).await?;
        self.cache
            .put(base, snapshot.clone(), Some(self.ttl))
            .await;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryCache;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockInnerProvider {
        call_count: AtomicUsize,
    }

    impl MockInnerProvider {
        fn new() -> Self {
            Self {
                call_count: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl<'a> RateProvider for &'a MockInnerProvider {
        async fn fetch_rates(&self, base: CurrencyCode) -> Result<RateSnapshot, ConverterError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            if base == CurrencyCode::USD {
                Ok(RateSnapshot::new(
                    base,
                    HashMap::from([(CurrencyCode::GBP, 0.79)]),
                ))
            } else {
                Err(ConverterError::ProviderUnavailable(503))
            }
        }
    }

    fn caching(inner: &MockInnerProvider) -> CachingRateProvider<&MockInnerProvider> {
        CachingRateProvider::new(
            inner,
            Arc::new(MemoryCache::new()),
            Duration::from_secs(300),
        )
    }

    #[tokio::test]
    async fn test_repeated_fetches_hit_cache() {
        let inner = MockInnerProvider::new();
        let provider = caching(&inner);

        let first = provider.fetch_rates(CurrencyCode::USD).await.unwrap();
        assert_eq!(first.rate(CurrencyCode::GBP), Some(0.79));
        assert_eq!(inner.calls(), 1);

        let second = provider.fetch_rates(CurrencyCode::USD).await.unwrap();
        assert_eq!(second, first);
        assert_eq!(inner.calls(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let inner = MockInnerProvider::new();
        let provider = caching(&inner);

        assert!(provider.fetch_rates(CurrencyCode::EUR).await.is_err());
        assert!(provider.fetch_rates(CurrencyCode::EUR).await.is_err());
        assert_eq!(inner.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_snapshot_is_refetched() {
        let inner = MockInnerProvider::new();
        let provider = caching(&inner);

        provider.fetch_rates(CurrencyCode::USD).await.unwrap();
        tokio::time::advance(Duration::from_secs(301)).await;
        provider.fetch_rates(CurrencyCode::USD).await.unwrap();
        assert_eq!(inner.calls(), 2);
    }

    #[tokio::test]
    async fn test_cleared_cache_forces_refetch() {
        let inner = MockInnerProvider::new();
        let cache: Arc<dyn Cache<CurrencyCode, RateSnapshot>> = Arc::new(MemoryCache::new());
        let provider = CachingRateProvider::new(&inner, Arc::clone(&cache), Duration::from_secs(300));

        provider.fetch_rates(CurrencyCode::USD).await.unwrap();
        cache.clear().await;
        provider.fetch_rates(CurrencyCode::USD).await.unwrap();
        assert_eq!(inner.calls(), 2);
    }
}
