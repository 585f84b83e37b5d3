//! State snapshot — the batched notification carrying several collections
//! at once. Every nested collection gets its own entity transform.

use crate::domain::market::{self, Market};
use crate::domain::mint::Mint;
use crate::domain::order::{transform_limit_order, LimitOrder};
use crate::domain::pool::{transform_order_book, OrderBook};
use crate::domain::position::{transform_lp, transform_spot, TunaLpPosition, TunaSpotPosition};
use crate::shared::coerce::{self, with_object};
use crate::shared::{serde_util, AmountWithUsd, Value};
use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-pool figures included in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSnapshot {
    #[serde(with = "serde_util::int_str")]
    pub liquidity: u128,
    pub tick_current_index: i32,
    #[serde(deserialize_with = "serde_util::float::deserialize")]
    pub price: f64,
    #[serde(deserialize_with = "serde_util::float::deserialize")]
    pub sqrt_price: f64,
    #[serde(default, deserialize_with = "serde_util::float::deserialize")]
    pub tvl: f64,
    #[serde(default, rename = "priceChange24h", alias = "priceChange24H")]
    pub price_change_24h: f64,
    #[serde(default, rename = "volume24h", alias = "volume24H")]
    pub volume_24h: f64,
    #[serde(default, rename = "fees24h", alias = "fees24H")]
    pub fees_24h: f64,
    pub borrowed_funds_a: AmountWithUsd,
    pub borrowed_funds_b: AmountWithUsd,
    pub borrow_limit_a: AmountWithUsd,
    pub borrow_limit_b: AmountWithUsd,
}

pub fn transform_pool_snapshot(value: &mut Value) {
    with_object(value, |obj| {
        coerce::int(obj, "liquidity");
        coerce::amounts(
            obj,
            &["borrowedFundsA", "borrowedFundsB", "borrowLimitA", "borrowLimitB"],
        );
    });
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    #[serde(with = "serde_util::int_str")]
    pub slot: u64,
    pub block_time: DateTime<Utc>,
    /// Pool address → pool figures.
    #[serde(default)]
    pub pools: BTreeMap<String, PoolSnapshot>,
    #[serde(default)]
    pub markets: BTreeMap<String, Market>,
    #[serde(default)]
    pub mints: BTreeMap<String, Mint>,
    #[serde(default)]
    pub tuna_spot_positions: Vec<TunaSpotPosition>,
    #[serde(default)]
    pub tuna_lp_positions: Vec<TunaLpPosition>,
    #[serde(default)]
    pub fusion_limit_orders: Vec<LimitOrder>,
    /// Pool address → order book. Sent either keyed or as a plain array;
    /// array entries are keyed by their position.
    #[serde(default, deserialize_with = "order_books")]
    pub order_books: BTreeMap<String, OrderBook>,
}

/// Force `slot` and `blockTime`, then transform every nested collection.
pub fn transform(value: &mut Value) {
    with_object(value, |obj| {
        coerce::int(obj, "slot");
        coerce::date(obj, "blockTime");
        coerce::map_values(obj, "pools", transform_pool_snapshot);
        coerce::nested(obj, "markets", market::transform_map);
        coerce::each(obj, "tunaSpotPositions", transform_spot);
        coerce::each(obj, "tunaLpPositions", transform_lp);
        coerce::each(obj, "fusionLimitOrders", transform_limit_order);
        match obj.get(ORDER_BOOKS) {
            Some(Value::Array(_)) => coerce::each(obj, ORDER_BOOKS, transform_order_book),
            _ => coerce::map_values(obj, ORDER_BOOKS, transform_order_book),
        }
    });
}

const ORDER_BOOKS: &str = "orderBooks";

fn order_books<'de, D>(deserializer: D) -> Result<BTreeMap<String, OrderBook>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Keyed(BTreeMap<String, OrderBook>),
        List(Vec<OrderBook>),
        Missing(()),
    }

    match Repr::deserialize(deserializer) {
        Ok(Repr::Keyed(map)) => Ok(map),
        Ok(Repr::List(list)) => Ok(list
            .into_iter()
            .enumerate()
            .map(|(i, book)| (i.to_string(), book))
            .collect()),
        Ok(Repr::Missing(())) => Ok(BTreeMap::new()),
        Err(e) => Err(de::Error::custom(format!("invalid orderBooks: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::normalize_value;
    use serde_json::json;

    const POOL: &str = "Czfq3xZZDmsdGdUyrNLtRhGc47cXcZtLG4crryfu44zE";
    const SOL: &str = "So11111111111111111111111111111111111111112";
    const USER: &str = "HJPjoWUrhoZzkNfRpHuieeFk9WcZWjwy6PBjZ81ngndJ";

    fn book() -> serde_json::Value {
        json!({
            "entries": [{
                "concentrated_amount": "10",
                "concentrated_amount_quote": "20",
                "concentrated_total": "10",
                "concentrated_total_quote": "20",
                "limit_amount": 0,
                "limit_amount_quote": 0,
                "limit_total": 0,
                "limit_total_quote": 0,
                "price": 150.5,
                "ask_side": true
            }],
            "pool_price": 150.0
        })
    }

    #[test]
    fn test_snapshot_forces_slot_and_block_time() {
        let mut v = normalize_value(json!({
            "slot": 345678901,
            "block_time": "2025-05-05T05:05:05+00:00"
        }));
        // Neither a string integer nor a `Z` timestamp, so the reviver left both alone.
        assert!(!matches!(v.get("slot"), Some(Value::Integer(_))));
        assert!(v.get("blockTime").and_then(Value::as_datetime).is_none());
        transform(&mut v);
        assert_eq!(v.get("slot"), Some(&Value::Integer(345678901)));
        assert!(v.get("blockTime").and_then(Value::as_datetime).is_some());

        let snapshot: StateSnapshot = v.deserialize_into().unwrap();
        assert_eq!(snapshot.slot, 345678901);
        assert!(snapshot.pools.is_empty());
        assert!(snapshot.order_books.is_empty());
    }

    #[test]
    fn test_snapshot_transforms_nested_collections() {
        let mut v = normalize_value(json!({
            "slot": "1",
            "block_time": "2025-05-05T05:05:05Z",
            "pools": {
                POOL: {
                    "liquidity": 99,
                    "tick_current_index": -5,
                    "price": 150.0,
                    "sqrt_price": "225.5",
                    "tvl": 1000.0,
                    "price_change_24h": 0.5,
                    "volume_24h": 10.0,
                    "fees_24h": 0.1,
                    "borrowed_funds_a": {"amount": 1, "usd": 0.0},
                    "borrowed_funds_b": {"amount": 2, "usd": 0.0},
                    "borrow_limit_a": {"amount": "3", "usd": 0.0},
                    "borrow_limit_b": {"amount": "4", "usd": 0.0}
                }
            },
            "fusion_limit_orders": [{
                "address": USER,
                "mint": SOL,
                "pool": POOL,
                "state": "open",
                "a_to_b": false,
                "tick_index": 10,
                "fill_ratio": 0.0,
                "open_tx_signature": "s",
                "close_tx_signature": null,
                "amount_in": {"amount": 5, "usd": 0.0},
                "amount_out": {"amount": 6, "usd": 0.0},
                "opened_at": 1714564800000i64,
                "closed_at": null
            }],
            "order_books": [book()]
        }));
        transform(&mut v);

        let pool = v.get("pools").and_then(|p| p.get(POOL)).unwrap();
        assert_eq!(pool.get("liquidity"), Some(&Value::Integer(99)));
        let order = &v.get("fusionLimitOrders").unwrap().as_array().unwrap()[0];
        assert!(order.get("openedAt").and_then(Value::as_datetime).is_some());

        let snapshot: StateSnapshot = v.deserialize_into().unwrap();
        assert_eq!(snapshot.pools[POOL].price_change_24h, 0.5);
        assert_eq!(snapshot.pools[POOL].borrow_limit_b.amount, 4);
        assert_eq!(snapshot.fusion_limit_orders[0].amount_in.amount, 5);
        assert_eq!(snapshot.order_books["0"].entries[0].concentrated_amount, 10);
    }

    #[test]
    fn test_keyed_order_books() {
        let mut v = normalize_value(json!({
            "slot": 2,
            "block_time": "2025-05-05T05:05:05Z",
            "order_books": { POOL: book() }
        }));
        transform(&mut v);
        let snapshot: StateSnapshot = v.deserialize_into().unwrap();
        assert!(snapshot.order_books[POOL].entries[0].ask_side);
    }
}
