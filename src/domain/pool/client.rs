//! Pools sub-client — pools, swaps, order books, ticks, price candles.

use crate::client::TunaClient;
use crate::domain::pool::{
    transform, transform_candle, transform_order_book, transform_swap, transform_ticks, OrderBook,
    Pool, PoolPriceCandle, PoolSwap, PoolTicks,
};
use crate::error::SdkError;
use crate::http::RequestEnvelope;
use crate::shared::PoolProvider;
use chrono::{DateTime, SecondsFormat, Utc};

pub struct Pools<'a> {
    pub(crate) client: &'a TunaClient,
}

impl<'a> Pools<'a> {
    /// All pools, optionally restricted to one provider.
    pub async fn all(&self, provider: Option<PoolProvider>) -> Result<Vec<Pool>, SdkError> {
        let request =
            RequestEnvelope::get("v1/pools").query_opt("provider", provider.map(|p| p.as_str()));
        self.client.fetch(request, transform).await
    }

    pub async fn get(&self, address: &str) -> Result<Pool, SdkError> {
        self.client
            .fetch(RequestEnvelope::get(format!("v1/pools/{}", address)), transform)
            .await
    }

    pub async fn swaps(&self, address: &str) -> Result<Vec<PoolSwap>, SdkError> {
        self.client
            .fetch(
                RequestEnvelope::get(format!("v1/pools/{}/swaps", address)),
                transform_swap,
            )
            .await
    }

    /// Aggregated order book bucketed by `price_step`.
    pub async fn order_book(
        &self,
        address: &str,
        price_step: f64,
        inverted: bool,
    ) -> Result<OrderBook, SdkError> {
        let mut request = RequestEnvelope::get(format!("v1/pools/{}/order-book", address))
            .query("priceStep", price_step.to_string());
        if inverted {
            request = request.query("inverted", "true");
        }
        self.client.fetch(request, transform_order_book).await
    }

    pub async fn ticks(&self, address: &str) -> Result<PoolTicks, SdkError> {
        self.client
            .fetch(
                RequestEnvelope::get(format!("v1/pools/{}/ticks", address)),
                transform_ticks,
            )
            .await
    }

    /// Price candles for `[from, to]`. `interval` is a duration string such
    /// as `5s`, `5m` or `1d`; `candles` caps how many come back.
    pub async fn candles(
        &self,
        address: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        interval: &str,
        candles: u32,
    ) -> Result<Vec<PoolPriceCandle>, SdkError> {
        let request = RequestEnvelope::get(format!("v1/pools/{}/candles", address))
            .query("from", from.to_rfc3339_opts(SecondsFormat::Millis, true))
            .query("to", to.to_rfc3339_opts(SecondsFormat::Millis, true))
            .query("candles", candles.to_string())
            .query("interval", interval);
        self.client.fetch(request, transform_candle).await
    }
}
