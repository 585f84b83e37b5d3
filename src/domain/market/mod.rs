//! Market domain — lending markets and their pools.

#[cfg(feature = "http")]
pub mod client;

use crate::domain::pool::{self, Pool};
use crate::shared::coerce::{self, with_object};
use crate::shared::{AmountWithUsd, Address, Value};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A leveraged-liquidity market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    pub address: Address,
    #[serde(default)]
    pub address_lookup_table: Option<Address>,
    pub max_leverage: f64,
    #[serde(default)]
    pub max_swap_slippage: f64,
    #[serde(default)]
    pub protocol_fee: f64,
    #[serde(default)]
    pub protocol_fee_on_collateral: f64,
    #[serde(default)]
    pub liquidation_fee: f64,
    #[serde(default)]
    pub liquidation_threshold: f64,
    #[serde(default)]
    pub oracle_price_deviation_threshold: f64,
    #[serde(default)]
    pub rebalance_protocol_fee: f64,
    pub borrowed_funds_a: AmountWithUsd,
    pub borrowed_funds_b: AmountWithUsd,
    pub borrow_limit_a: AmountWithUsd,
    pub borrow_limit_b: AmountWithUsd,
    #[serde(default)]
    pub max_spot_position_size_a: Option<AmountWithUsd>,
    #[serde(default)]
    pub max_spot_position_size_b: Option<AmountWithUsd>,
    #[serde(default)]
    pub pool: Option<Pool>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

const MARKET_AMOUNTS: &[&str] = &[
    "borrowedFundsA",
    "borrowedFundsB",
    "borrowLimitA",
    "borrowLimitB",
    "maxSpotPositionSizeA",
    "maxSpotPositionSizeB",
];

pub fn transform(value: &mut Value) {
    with_object(value, |obj| {
        coerce::amounts(obj, MARKET_AMOUNTS);
        coerce::date(obj, "createdAt");
        coerce::nested(obj, "pool", pool::transform);
    });
}

/// Transform every market of an address-keyed map in place.
pub fn transform_map(value: &mut Value) {
    if let Some(markets) = value.as_object_mut() {
        markets.values_mut().for_each(transform);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::normalize_value;
    use serde_json::json;

    fn wire_market() -> serde_json::Value {
        json!({
            "address": "HJPjoWUrhoZzkNfRpHuieeFk9WcZWjwy6PBjZ81ngndJ",
            "max_leverage": 5.0,
            "borrowed_funds_a": {"amount": "1500", "usd": 0.3},
            "borrowed_funds_b": {"amount": 0, "usd": 0.0},
            "borrow_limit_a": {"amount": "100000000000", "usd": 20000.0},
            "borrow_limit_b": {"amount": "100000000000", "usd": 100000.0},
            "pool": {
                "address": "Czfq3xZZDmsdGdUyrNLtRhGc47cXcZtLG4crryfu44zE",
                "provider": "fusion",
                "token_a_mint": "So11111111111111111111111111111111111111112",
                "token_b_mint": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
                "tick_spacing": 64,
                "fee_rate": 3000,
                "liquidity": 1000,
                "sqrt_price": "7958768769876",
                "tick_current_index": 12,
                "stats": {"24h": {"volume": 1.0}}
            },
            "disabled": false,
            "created_at": "2025-01-10T08:00:00Z"
        })
    }

    #[test]
    fn test_market_transform_reaches_nested_pool() {
        let mut v = normalize_value(wire_market());
        transform(&mut v);
        assert_eq!(
            v.get("pool").and_then(|p| p.get("liquidity")),
            Some(&Value::Integer(1000))
        );
        assert_eq!(
            v.get("borrowedFundsB").and_then(|a| a.get("amount")),
            Some(&Value::Integer(0))
        );

        let market: Market = v.deserialize_into().unwrap();
        assert_eq!(market.borrow_limit_a.amount, 100_000_000_000);
        assert_eq!(market.pool.as_ref().map(|p| p.sqrt_price), Some(7958768769876));
        assert!(market.created_at.is_some());
    }

    #[test]
    fn test_transform_map_keeps_address_keys() {
        let address = "HJPjoWUrhoZzkNfRpHuieeFk9WcZWjwy6PBjZ81ngndJ";
        let mut v = normalize_value(json!({ address: wire_market() }));
        transform_map(&mut v);
        let market = v.get(address).unwrap();
        assert!(market.get("createdAt").and_then(Value::as_datetime).is_some());
    }
}
