//! Pool domain — pools, swaps, price updates, order books and ticks.

#[cfg(feature = "http")]
pub mod client;

use crate::shared::coerce::{self, with_object};
use crate::shared::{serde_util, Address, PoolProvider, Value};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ─── Pool ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    pub address: Address,
    pub provider: PoolProvider,
    pub token_a_mint: Address,
    pub token_b_mint: Address,
    #[serde(default)]
    pub token_a_vault: Option<Address>,
    #[serde(default)]
    pub token_b_vault: Option<Address>,
    #[serde(default, deserialize_with = "serde_util::float::deserialize")]
    pub tvl_usd: f64,
    pub tick_spacing: u16,
    pub fee_rate: u32,
    #[serde(default)]
    pub protocol_fee_rate: u32,
    #[serde(default)]
    pub olp_fee_rate: Option<u32>,
    #[serde(with = "serde_util::int_str")]
    pub liquidity: u128,
    #[serde(with = "serde_util::int_str")]
    pub sqrt_price: u128,
    #[serde(default)]
    pub price: f64,
    pub tick_current_index: i32,
    /// Rolling stats keyed by window (`"24h"`, `"7d"`, `"30d"`).
    #[serde(default)]
    pub stats: BTreeMap<String, PoolStats>,
}

/// Rolling pool statistics for one window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolStats {
    #[serde(default, deserialize_with = "serde_util::float::deserialize")]
    pub volume: f64,
    #[serde(default, deserialize_with = "serde_util::float::deserialize")]
    pub fees: f64,
    #[serde(default, deserialize_with = "serde_util::float::deserialize")]
    pub rewards: f64,
    #[serde(default, deserialize_with = "serde_util::float::deserialize")]
    pub yield_over_tvl: f64,
    #[serde(default, deserialize_with = "serde_util::float::deserialize")]
    pub price_change: f64,
}

pub fn transform(value: &mut Value) {
    with_object(value, |obj| {
        coerce::ints(obj, &["liquidity", "sqrtPrice"]);
    });
}

// ─── Swaps ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSwap {
    pub id: String,
    #[serde(with = "serde_util::int_str")]
    pub amount_in: u64,
    #[serde(with = "serde_util::int_str")]
    pub amount_out: u64,
    #[serde(default)]
    pub amount_usd: f64,
    pub a_to_b: bool,
    pub pool: Address,
    pub time: DateTime<Utc>,
}

pub fn transform_swap(value: &mut Value) {
    with_object(value, |obj| {
        coerce::ints(obj, &["amountIn", "amountOut"]);
        coerce::date(obj, "time");
    });
}

// ─── Price updates ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolPriceUpdate {
    pub pool: Address,
    pub price: f64,
    #[serde(with = "serde_util::int_str")]
    pub sqrt_price: u128,
    pub time: DateTime<Utc>,
}

pub fn transform_price_update(value: &mut Value) {
    with_object(value, |obj| {
        coerce::int(obj, "sqrtPrice");
        coerce::date(obj, "time");
    });
}

// ─── Order book ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBookEntry {
    #[serde(with = "serde_util::int_str")]
    pub concentrated_amount: u64,
    #[serde(with = "serde_util::int_str")]
    pub concentrated_amount_quote: u64,
    #[serde(with = "serde_util::int_str")]
    pub concentrated_total: u64,
    #[serde(with = "serde_util::int_str")]
    pub concentrated_total_quote: u64,
    #[serde(with = "serde_util::int_str")]
    pub limit_amount: u64,
    #[serde(with = "serde_util::int_str")]
    pub limit_amount_quote: u64,
    #[serde(with = "serde_util::int_str")]
    pub limit_total: u64,
    #[serde(with = "serde_util::int_str")]
    pub limit_total_quote: u64,
    pub price: f64,
    pub ask_side: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBook {
    pub entries: Vec<OrderBookEntry>,
    pub pool_price: f64,
}

const ORDER_BOOK_ENTRY_INTS: &[&str] = &[
    "concentratedAmount",
    "concentratedAmountQuote",
    "concentratedTotal",
    "concentratedTotalQuote",
    "limitAmount",
    "limitAmountQuote",
    "limitTotal",
    "limitTotalQuote",
];

pub fn transform_order_book(value: &mut Value) {
    with_object(value, |obj| {
        coerce::each(obj, "entries", |entry| {
            with_object(entry, |e| coerce::ints(e, ORDER_BOOK_ENTRY_INTS))
        });
    });
}

// ─── Ticks ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tick {
    pub index: i32,
    #[serde(with = "serde_util::int_str")]
    pub liquidity: i128,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolTicks {
    pub tick_spacing: u16,
    pub ticks: Vec<Tick>,
}

pub fn transform_ticks(value: &mut Value) {
    with_object(value, |obj| {
        coerce::each(obj, "ticks", |tick| {
            with_object(tick, |t| coerce::int(t, "liquidity"))
        });
    });
}

// ─── Price candles ───────────────────────────────────────────────────────────

/// One OHLCV candle. `time` is the bucket start in epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolPriceCandle {
    #[serde(with = "serde_util::int_str")]
    pub time: i64,
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    #[serde(default, deserialize_with = "serde_util::float::deserialize")]
    pub volume: f64,
}

pub fn transform_candle(value: &mut Value) {
    with_object(value, |obj| coerce::int(obj, "time"));
}
