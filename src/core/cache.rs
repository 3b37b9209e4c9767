//! Cache abstraction used to memoize fetched rates

use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait Cache<K, V>: Send + Sync {
    async fn get(&self, key: &K) -> Option<V>;

    /// Stores `value`; with a `ttl` the entry stops being returned once it elapses.
    async fn put(&self, key: K, value: V, ttl: Option<Duration>);

    async fn remove(&self, key: &K);

    async fn clear(&self);
}
