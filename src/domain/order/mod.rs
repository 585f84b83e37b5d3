//! Order domain — limit orders plus the trade and order history feeds.

#[cfg(feature = "http")]
pub mod client;

use crate::domain::market::{self, Market};
use crate::domain::mint::Mint;
use crate::shared::coerce::{self, with_object};
use crate::shared::{AmountWithUsd, Address, Value};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ─── Limit orders ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitOrderState {
    Open,
    PartiallyFilled,
    Filled,
    Complete,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl LimitOrderState {
    pub fn is_active(&self) -> bool {
        matches!(self, LimitOrderState::Open | LimitOrderState::PartiallyFilled)
    }
}

/// A Fusion pool limit order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitOrder {
    pub address: Address,
    pub mint: Address,
    pub pool: Address,
    pub state: LimitOrderState,
    pub a_to_b: bool,
    pub tick_index: i32,
    pub fill_ratio: f64,
    pub open_tx_signature: String,
    #[serde(default)]
    pub close_tx_signature: Option<String>,
    pub amount_in: AmountWithUsd,
    pub amount_out: AmountWithUsd,
    pub opened_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

pub fn transform_limit_order(value: &mut Value) {
    with_object(value, |obj| {
        coerce::amounts(obj, &["amountIn", "amountOut"]);
        coerce::dates(obj, &["openedAt", "closedAt"]);
    });
}

// ─── History ─────────────────────────────────────────────────────────────────

/// One executed trade of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeHistoryEntry {
    #[serde(default)]
    pub id: String,
    pub position_address: Address,
    pub authority: Address,
    /// Key into the listing's market map.
    pub market: Address,
    pub action: String,
    #[serde(default)]
    pub a_to_b: bool,
    #[serde(default)]
    pub ui_direction: Option<String>,
    pub base_token: AmountWithUsd,
    pub quote_token: AmountWithUsd,
    #[serde(default)]
    pub fee: Option<AmountWithUsd>,
    #[serde(default)]
    pub pnl: Option<AmountWithUsd>,
    #[serde(default)]
    pub tx_signature: Option<String>,
    pub time: DateTime<Utc>,
}

pub fn transform_trade(value: &mut Value) {
    with_object(value, |obj| {
        coerce::amounts(obj, &["baseToken", "quoteToken", "fee", "pnl"]);
        coerce::date(obj, "time");
    });
}

/// Lifecycle event of one order of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderHistoryEntry {
    #[serde(default)]
    pub id: String,
    pub position_address: Address,
    pub authority: Address,
    pub market: Address,
    pub order_type: String,
    #[serde(default)]
    pub is_reduce_only: bool,
    #[serde(default)]
    pub a_to_b: bool,
    #[serde(default)]
    pub ui_direction: Option<String>,
    pub status: String,
    #[serde(default)]
    pub base_token: Option<AmountWithUsd>,
    #[serde(default)]
    pub quote_token: Option<AmountWithUsd>,
    #[serde(default)]
    pub base_token_consumed_amount: Option<AmountWithUsd>,
    #[serde(default)]
    pub quote_token_filled_amount: Option<AmountWithUsd>,
    #[serde(default)]
    pub tx_signature: Option<String>,
    pub time: DateTime<Utc>,
}

pub fn transform_order(value: &mut Value) {
    with_object(value, |obj| {
        coerce::amounts(
            obj,
            &[
                "baseToken",
                "quoteToken",
                "baseTokenConsumedAmount",
                "quoteTokenFilledAmount",
            ],
        );
        coerce::date(obj, "time");
    });
}

/// Filters for the history endpoints. Empty fields are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryFilter {
    pub pools: Vec<Address>,
    pub action: Option<String>,
    pub ui_direction: Option<String>,
}

impl HistoryFilter {
    pub fn pool(mut self, pool: Address) -> Self {
        self.pools.push(pool);
        self
    }

    pub fn action(mut self, action: &str) -> Self {
        self.action = Some(action.to_string());
        self
    }

    pub fn ui_direction(mut self, direction: &str) -> Self {
        self.ui_direction = Some(direction.to_string());
        self
    }
}

/// A single pushed history item with the markets and mints it references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryUpdate<T> {
    pub item: T,
    #[serde(default)]
    pub markets: BTreeMap<String, Market>,
    #[serde(default)]
    pub mints: BTreeMap<String, Mint>,
}

/// Transform `{ item, markets, mints }`: `item_fn` on the item, the market
/// transform on every market.
pub fn transform_history_update(value: &mut Value, item_fn: impl Fn(&mut Value)) {
    with_object(value, |obj| {
        coerce::nested(obj, "item", item_fn);
        coerce::nested(obj, "markets", market::transform_map);
    });
}
