//! Oracle price domain.

#[cfg(feature = "http")]
pub mod client;

use crate::shared::coerce::{self, with_object};
use crate::shared::{serde_util, Address, Value};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Latest oracle price of a token. `price` is scaled by `10^decimals`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenOraclePrice {
    pub mint: Address,
    #[serde(with = "serde_util::int_str")]
    pub price: u128,
    pub decimals: u8,
    pub time: DateTime<Utc>,
}

impl TokenOraclePrice {
    /// Price as a float. Lossy; for display only.
    pub fn price_f64(&self) -> f64 {
        self.price as f64 / 10f64.powi(self.decimals as i32)
    }
}

pub fn transform(value: &mut Value) {
    with_object(value, |obj| {
        coerce::int(obj, "price");
        coerce::date(obj, "time");
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::normalize_value;
    use serde_json::json;

    #[test]
    fn test_oracle_price_epoch_millis_time() {
        let mut v = normalize_value(json!({
            "mint": "So11111111111111111111111111111111111111112",
            "price": 15012345678i64,
            "decimals": 8,
            "time": 1714564800000i64
        }));
        transform(&mut v);
        let price: TokenOraclePrice = v.deserialize_into().unwrap();
        assert_eq!(price.price, 15012345678);
        assert_eq!(price.time.timestamp(), 1714564800);
        assert!((price.price_f64() - 150.12345678).abs() < 1e-9);
    }
}
