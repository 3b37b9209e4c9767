//! Browser front-end. Each request carries its session in the submitted
//! form and is handled to completion; only the rate cache is shared.

pub mod handlers;
pub mod page;

use crate::core::cache::Cache;
use crate::core::config::AppConfig;
use crate::core::currency::{CurrencyCode, RateProvider, RateSnapshot};
use crate::providers::{CachingRateProvider, OpenErApiProvider};
use crate::store::memory::MemoryCache;
use anyhow::{Context, Result};
use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::info;

pub struct AppState {
    pub provider: Arc<dyn RateProvider>,
    pub cache: Arc<dyn Cache<CurrencyCode, RateSnapshot>>,
}

impl AppState {
    /// Wraps `provider` in a time-boxed cache that the Refresh action can drop.
    pub fn new<P: RateProvider + 'static>(provider: P, ttl: Duration) -> Self {
        let cache: Arc<dyn Cache<CurrencyCode, RateSnapshot>> = Arc::new(MemoryCache::new());
        let provider = CachingRateProvider::new(provider, Arc::clone(&cache), ttl);
        Self {
            provider: Arc::new(provider),
            cache,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index).post(handlers::submit))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: &AppConfig, listen: Option<SocketAddr>) -> Result<()> {
    let provider = OpenErApiProvider::new(&config.provider)?;
    let state = Arc::new(AppState::new(provider, config.cache_ttl()));

    let addr = listen.unwrap_or(config.web.listen_addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down web server");
        })
        .await
        .context("Web server failed")
}
