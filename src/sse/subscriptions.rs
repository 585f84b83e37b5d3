//! Stream subscription payloads.
//!
//! Built in application casing; the request normalizer snake_cases the body
//! before it is sent (`orderBookPriceStep` → `order_book_price_step`).

use crate::shared::Address;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolSubscriptionTopic {
    OrderBook,
    PoolPrices,
    PoolSwaps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletSubscriptionTopic {
    TunaPositions,
    LendingPositions,
    FusionLimitOrders,
    StakingPosition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSubscription {
    pub address: Address,
    pub topics: Vec<PoolSubscriptionTopic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_book_price_step: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_inverted: Option<bool>,
}

impl PoolSubscription {
    pub fn new(address: Address, topics: &[PoolSubscriptionTopic]) -> Self {
        Self {
            address,
            topics: topics.to_vec(),
            order_book_price_step: None,
            is_inverted: None,
        }
    }

    /// Order book bucketing. Only meaningful with [`PoolSubscriptionTopic::OrderBook`].
    pub fn order_book(mut self, price_step: f64, inverted: bool) -> Self {
        self.order_book_price_step = Some(price_step);
        self.is_inverted = Some(inverted);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletSubscription {
    pub address: Address,
    pub topics: Vec<WalletSubscriptionTopic>,
}

/// Server-side filter of a stream. Replaces the previous one entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPayload {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pools: Vec<PoolSubscription>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet: Option<WalletSubscription>,
}

impl SubscriptionPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(mut self, pool: PoolSubscription) -> Self {
        self.pools.push(pool);
        self
    }

    pub fn wallet(mut self, address: Address, topics: &[WalletSubscriptionTopic]) -> Self {
        self.wallet = Some(WalletSubscription {
            address,
            topics: topics.to_vec(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty() && self.wallet.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStreamSubscriptionResult {
    pub status: String,
}

/// `PUT v1/streams/{id}/subscription`.
#[cfg(feature = "http")]
pub(crate) async fn put_subscription(
    http: &crate::http::TunaHttp,
    stream_id: &str,
    payload: &SubscriptionPayload,
) -> Result<UpdateStreamSubscriptionResult, crate::error::SdkError> {
    use crate::http::{unwrap_into, RequestEnvelope};

    let request =
        RequestEnvelope::put(format!("v1/streams/{}/subscription", stream_id)).json(payload)?;
    unwrap_into(http.execute(request).await)
}
