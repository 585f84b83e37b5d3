//! Vault domain — lending vaults and their history.

#[cfg(feature = "http")]
pub mod client;

use crate::shared::coerce::{self, with_object};
use crate::shared::{serde_util, AmountWithUsd, Address, Value};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vault {
    pub address: Address,
    pub mint: Address,
    pub deposited_funds: AmountWithUsd,
    pub borrowed_funds: AmountWithUsd,
    pub supply_limit: AmountWithUsd,
    #[serde(with = "serde_util::int_str")]
    pub borrowed_shares: u128,
    #[serde(with = "serde_util::int_str")]
    pub deposited_shares: u128,
    pub supply_apy: f64,
    pub borrow_apy: f64,
    pub utilization: f64,
    #[serde(default)]
    pub pyth_oracle_feed_id: Option<String>,
    #[serde(default)]
    pub pyth_oracle_price_update: Option<String>,
}

pub fn transform(value: &mut Value) {
    with_object(value, |obj| {
        coerce::amounts(obj, &["depositedFunds", "borrowedFunds", "supplyLimit"]);
        coerce::ints(obj, &["borrowedShares", "depositedShares"]);
    });
}

/// One day of vault history. `date` is a calendar day (`YYYY-MM-DD`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultHistoricalStats {
    pub date: NaiveDate,
    pub supply: AmountWithUsd,
    pub borrow: AmountWithUsd,
    pub supply_apy: f64,
    pub borrow_apr: f64,
}

pub fn transform_history(value: &mut Value) {
    with_object(value, |obj| coerce::amounts(obj, &["supply", "borrow"]));
}
