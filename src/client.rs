//! High-level client — `TunaClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, shared cache state, and accessor methods.

use crate::domain::market::client::Markets;
use crate::domain::market::Market;
use crate::domain::mint::client::Mints;
use crate::domain::oracle::client::OraclePrices;
use crate::domain::order::client::Orders;
use crate::domain::pool::client::Pools;
use crate::domain::position::client::Positions;
use crate::domain::staking::client::Staking;
use crate::domain::stats::client::Stats;
use crate::domain::vault::client::Vaults;
use crate::error::SdkError;
use crate::http::unwrap::decode;
use crate::http::{unwrap, ClientConfig, RequestEnvelope, ResponseStyle, RetryOn, TunaHttp};
use crate::shared::coerce::one_or_many;
use crate::shared::Value;
use crate::sse::client::Streams;
use crate::sse::{SubscriptionPayload, UpdateStreamSubscriptionResult};

use async_lock::RwLock;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

// Re-export sub-client types for convenience.
pub use crate::domain::market::client::Markets as MarketsClient;
pub use crate::domain::mint::client::Mints as MintsClient;
pub use crate::domain::oracle::client::OraclePrices as OraclePricesClient;
pub use crate::domain::order::client::Orders as OrdersClient;
pub use crate::domain::pool::client::Pools as PoolsClient;
pub use crate::domain::position::client::Positions as PositionsClient;
pub use crate::domain::staking::client::Staking as StakingClient;
pub use crate::domain::stats::client::Stats as StatsClient;
pub use crate::domain::vault::client::Vaults as VaultsClient;
pub use crate::sse::client::Streams as StreamsClient;

/// The primary entry point for the DefiTuna API.
///
/// Provides nested sub-client accessors for each domain:
/// `client.markets()`, `client.pools()`, etc.
pub struct TunaClient {
    pub(crate) http: TunaHttp,
    /// Market cache: address → (Market, fetched_at)
    pub(crate) market_cache: Arc<RwLock<HashMap<String, (Market, Instant)>>>,
    /// Cache TTL for markets
    pub(crate) market_cache_ttl: Duration,
}

impl TunaClient {
    pub fn builder() -> TunaClientBuilder {
        TunaClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn mints(&self) -> Mints<'_> {
        Mints { client: self }
    }

    pub fn markets(&self) -> Markets<'_> {
        Markets { client: self }
    }

    pub fn oracle_prices(&self) -> OraclePrices<'_> {
        OraclePrices { client: self }
    }

    pub fn vaults(&self) -> Vaults<'_> {
        Vaults { client: self }
    }

    pub fn pools(&self) -> Pools<'_> {
        Pools { client: self }
    }

    pub fn positions(&self) -> Positions<'_> {
        Positions { client: self }
    }

    pub fn orders(&self) -> Orders<'_> {
        Orders { client: self }
    }

    pub fn staking(&self) -> Staking<'_> {
        Staking { client: self }
    }

    pub fn stats(&self) -> Stats<'_> {
        Stats { client: self }
    }

    pub fn streams(&self) -> Streams<'_> {
        Streams { client: self }
    }

    // ── Configuration ────────────────────────────────────────────────────

    /// The low-level HTTP client. Shares configuration with this client.
    pub fn http(&self) -> &TunaHttp {
        &self.http
    }

    /// Snapshot of the current configuration.
    pub async fn config(&self) -> ClientConfig {
        self.http.config().await
    }

    /// Replace the configuration. Last writer wins; requests already in
    /// flight keep the configuration they started with. Cached markets
    /// belong to the previous backend and are dropped.
    pub async fn set_config(&self, config: ClientConfig) {
        self.http.set_config(config).await;
        self.clear_all_caches().await;
    }

    pub async fn set_base_url(&self, url: &str) {
        self.http.set_base_url(url).await;
        self.clear_all_caches().await;
    }

    /// Shorthand for `streams().update_subscription(..)`.
    pub async fn update_stream_subscription(
        &self,
        stream_id: &str,
        payload: &SubscriptionPayload,
    ) -> Result<UpdateStreamSubscriptionResult, SdkError> {
        self.streams().update_subscription(stream_id, payload).await
    }

    /// Clear all HTTP caches.
    pub async fn clear_all_caches(&self) {
        self.market_cache.write().await.clear();
    }

    // ── Shared fetch path ────────────────────────────────────────────────

    /// Execute, unwrap, apply `transform` to the payload (element-wise for
    /// lists) and decode into `T`.
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        envelope: RequestEnvelope,
        transform: impl Fn(&mut Value),
    ) -> Result<T, SdkError> {
        let mut value = unwrap(self.http.execute(envelope).await)?;
        one_or_many(&mut value, transform);
        decode(value)
    }

    /// Like [`fetch`](Self::fetch), but `transform` sees the whole payload.
    /// For paged and listing responses that handle their own shape.
    pub(crate) async fn fetch_page<T: DeserializeOwned>(
        &self,
        envelope: RequestEnvelope,
        transform: impl Fn(&mut Value),
    ) -> Result<T, SdkError> {
        let mut value = unwrap(self.http.execute(envelope).await)?;
        transform(&mut value);
        decode(value)
    }
}

impl Clone for TunaClient {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            market_cache: self.market_cache.clone(),
            market_cache_ttl: self.market_cache_ttl,
        }
    }
}

impl std::fmt::Debug for TunaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TunaClient")
            .field("market_cache_ttl", &self.market_cache_ttl)
            .finish_non_exhaustive()
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct TunaClientBuilder {
    config: ClientConfig,
    market_cache_ttl: Duration,
}

impl Default for TunaClientBuilder {
    fn default() -> Self {
        Self {
            config: ClientConfig::default(),
            market_cache_ttl: Duration::from_secs(60),
        }
    }
}

impl TunaClientBuilder {
    pub fn base_url(mut self, url: &str) -> Self {
        self.config.base_url = url.to_string();
        self
    }

    /// Per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn http_retries(mut self, retries: u32) -> Self {
        self.config.http_retries = retries;
        self
    }

    /// Default header sent with every request.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.config.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn response_style(mut self, style: ResponseStyle) -> Self {
        self.config.response_style = style;
        self
    }

    pub fn throw_on_error(mut self, throw: bool) -> Self {
        self.config.throw_on_error = throw;
        self
    }

    pub fn retry_on(mut self, retry_on: RetryOn) -> Self {
        self.config.retry_on = retry_on;
        self
    }

    pub fn market_cache_ttl(mut self, ttl: Duration) -> Self {
        self.market_cache_ttl = ttl;
        self
    }

    /// Start from a complete configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<TunaClient, SdkError> {
        if self.config.base_url.trim().is_empty() {
            return Err(SdkError::Validation("base URL must not be empty".to_string()));
        }
        let mut config = self.config;
        config.base_url = crate::http::config::trim_base_url(&config.base_url);

        Ok(TunaClient {
            http: TunaHttp::new(config)?,
            market_cache: Arc::new(RwLock::new(HashMap::new())),
            market_cache_ttl: self.market_cache_ttl,
        })
    }
}
