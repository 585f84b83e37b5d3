//! Markets sub-client — fetch with a TTL cache.

use crate::client::TunaClient;
use crate::domain::market::{transform, Market};
use crate::error::SdkError;
use crate::http::RequestEnvelope;
use std::time::Instant;

/// Sub-client for market operations.
pub struct Markets<'a> {
    pub(crate) client: &'a TunaClient,
}

impl<'a> Markets<'a> {
    /// All markets. Refreshes the cache.
    pub async fn all(&self) -> Result<Vec<Market>, SdkError> {
        let markets: Vec<Market> = self
            .client
            .fetch(RequestEnvelope::get("v1/markets"), transform)
            .await?;

        let now = Instant::now();
        let mut cache = self.client.market_cache.write().await;
        for market in &markets {
            cache.insert(market.address.to_string(), (market.clone(), now));
        }
        Ok(markets)
    }

    /// Get a market by address. Uses TTL cache.
    pub async fn get(&self, address: &str) -> Result<Market, SdkError> {
        {
            let cache = self.client.market_cache.read().await;
            if let Some((market, fetched_at)) = cache.get(address) {
                if fetched_at.elapsed() < self.client.market_cache_ttl {
                    return Ok(market.clone());
                }
            }
        }

        let market: Market = self
            .client
            .fetch(RequestEnvelope::get(format!("v1/markets/{}", address)), transform)
            .await?;
        self.client
            .market_cache
            .write()
            .await
            .insert(address.to_string(), (market.clone(), Instant::now()));
        Ok(market)
    }

    /// Invalidate a cached market by address.
    pub async fn invalidate(&self, address: &str) {
        self.client.market_cache.write().await.remove(address);
    }

    pub async fn clear_cache(&self) {
        self.client.market_cache.write().await.clear();
    }
}
