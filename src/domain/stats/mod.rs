//! Stats domain — platform fee and staking revenue aggregates.

#[cfg(feature = "http")]
pub mod client;

use crate::shared::coerce::{self, with_object};
use crate::shared::Value;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Collected fees for one interval bucket, with running totals since the
/// start of the requested range. All figures are USD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeesStatsGroup {
    pub time: DateTime<Utc>,
    pub add_liquidity_fees: f64,
    pub limit_order_fees: f64,
    pub yield_compounding_fees: f64,
    pub liquidation_fees: f64,
    pub total_liquidations_network_fees: f64,
    pub total_limit_orders_network_fees: f64,
    pub total_yield_compounding_network_fees: f64,
    pub failed_network_fees: f64,
    pub processed_network_fees: f64,
    pub total_collected_fees: f64,
    pub total_network_fees: f64,
    pub jito_liquidation_fees: f64,
    pub jito_limit_order_fees: f64,
    pub jito_yield_compounding_fees: f64,
    pub running_add_liquidity_fees: f64,
    pub running_limit_order_fees: f64,
    pub running_yield_compounding_fees: f64,
    pub running_liquidation_fees: f64,
    pub running_total_liquidations_network_fees: f64,
    pub running_total_limit_orders_network_fees: f64,
    pub running_total_yield_compounding_network_fees: f64,
    pub running_failed_network_fees: f64,
    pub running_processed_network_fees: f64,
    pub running_jito_liquidation_fees: f64,
    pub running_jito_limit_order_fees: f64,
    pub running_jito_yield_compounding_fees: f64,
    pub running_total_collected_fees: f64,
    pub running_total_network_fees: f64,
}

pub fn transform_fees(value: &mut Value) {
    with_object(value, |obj| coerce::date(obj, "time"));
}

/// Staking revenue deposited into the treasury during one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakingRevenueStatsGroup {
    pub time: DateTime<Utc>,
    pub total_deposits_usd: f64,
    /// Lamports.
    #[serde(with = "crate::shared::serde_util::int_str")]
    pub total_deposits_sol: u64,
    pub running_total_deposits_usd: f64,
    #[serde(with = "crate::shared::serde_util::int_str")]
    pub running_total_deposits_sol: u64,
}

pub fn transform_staking_revenue(value: &mut Value) {
    with_object(value, |obj| {
        coerce::date(obj, "time");
        coerce::ints(obj, &["totalDepositsSol", "runningTotalDepositsSol"]);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::normalize_value;
    use serde_json::json;

    #[test]
    fn test_staking_revenue_from_wire() {
        let mut v = normalize_value(json!({
            "time": 1735689600000u64,
            "total_deposits_usd": 1520.75,
            "total_deposits_sol": 10000000000u64,
            "running_total_deposits_usd": 3041.5,
            "running_total_deposits_sol": "20000000000"
        }));
        transform_staking_revenue(&mut v);
        assert!(matches!(v.get("time"), Some(Value::DateTime(_))));
        assert_eq!(v.get("totalDepositsSol"), Some(&Value::Integer(10_000_000_000)));

        let group: StakingRevenueStatsGroup = v.deserialize_into().unwrap();
        assert_eq!(group.time.timestamp_millis(), 1735689600000);
        assert_eq!(group.running_total_deposits_sol, 20_000_000_000);
        assert_eq!(group.total_deposits_usd, 1520.75);
    }
}
