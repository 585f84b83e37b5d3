//! Orders sub-client — limit orders and trade/order history.

use crate::client::TunaClient;
use crate::domain::order::{
    transform_limit_order, transform_order, transform_trade, HistoryFilter, LimitOrder,
    OrderHistoryEntry, TradeHistoryEntry,
};
use crate::domain::{transform_listing, Listing};
use crate::error::SdkError;
use crate::http::RequestEnvelope;
use crate::shared::{Address, Value};

pub struct Orders<'a> {
    pub(crate) client: &'a TunaClient,
}

impl<'a> Orders<'a> {
    /// Limit orders of a user, optionally restricted to some pools.
    pub async fn limit_orders(
        &self,
        user: &str,
        pools: &[Address],
    ) -> Result<Listing<LimitOrder>, SdkError> {
        let envelope = with_pools(
            RequestEnvelope::get(format!("v1/users/{}/limit-orders", user)),
            pools,
        );
        self.client
            .fetch_page(envelope, |v: &mut Value| {
                transform_listing(v, transform_limit_order)
            })
            .await
    }

    pub async fn limit_order(&self, user: &str, address: &str) -> Result<LimitOrder, SdkError> {
        self.client
            .fetch(
                RequestEnvelope::get(format!("v1/users/{}/limit-orders/{}", user, address)),
                transform_limit_order,
            )
            .await
    }

    pub async fn trade_history(
        &self,
        user: &str,
        filter: &HistoryFilter,
    ) -> Result<Listing<TradeHistoryEntry>, SdkError> {
        let envelope = history_request(format!("v1/users/{}/trade-history", user), filter);
        self.client
            .fetch_page(envelope, |v: &mut Value| transform_listing(v, transform_trade))
            .await
    }

    pub async fn order_history(
        &self,
        user: &str,
        filter: &HistoryFilter,
    ) -> Result<Listing<OrderHistoryEntry>, SdkError> {
        let envelope = history_request(format!("v1/users/{}/order-history", user), filter);
        self.client
            .fetch_page(envelope, |v: &mut Value| transform_listing(v, transform_order))
            .await
    }
}

fn with_pools(envelope: RequestEnvelope, pools: &[Address]) -> RequestEnvelope {
    if pools.is_empty() {
        return envelope;
    }
    let pools: Vec<String> = pools.iter().map(ToString::to_string).collect();
    envelope.query("pool", pools)
}

fn history_request(path: String, filter: &HistoryFilter) -> RequestEnvelope {
    with_pools(RequestEnvelope::get(path), &filter.pools)
        .query_opt("action", filter.action.clone())
        .query_opt("uiDirection", filter.ui_direction.clone())
}
