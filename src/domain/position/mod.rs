//! Position domain — leveraged LP positions, spot positions, lending positions.

#[cfg(feature = "http")]
pub mod client;

use crate::domain::mint::Mint;
use crate::shared::coerce::{self, with_object};
use crate::shared::{serde_util, AmountWithUsd, Address, PoolProvider, TokensPnl, UsdPnl, Value};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Shared ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TunaPositionState {
    Open,
    Liquidated,
    ClosedByLimitOrder,
    Closed,
    #[serde(other)]
    Unknown,
}

/// Side of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolToken {
    A,
    B,
}

/// Compact mint reference embedded in positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionMint {
    pub addr: Address,
    pub symbol: String,
    pub decimals: u8,
}

/// Compact pool reference embedded in positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionPool {
    pub addr: Address,
    pub price: f64,
    pub tick_spacing: u16,
}

// ─── LP positions ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoCompounding {
    WithLeverage,
    WithoutLeverage,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TunaLpPositionFlags {
    #[serde(default)]
    pub lower_limit_order_swap_to_token: Option<PoolToken>,
    #[serde(default)]
    pub upper_limit_order_swap_to_token: Option<PoolToken>,
    #[serde(default)]
    pub auto_compounding: Option<AutoCompounding>,
    #[serde(default)]
    pub auto_rebalancing: bool,
}

/// Leveraged concentrated-liquidity position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TunaLpPosition {
    pub address: Address,
    pub authority: Address,
    pub version: u16,
    pub state: TunaPositionState,
    pub position_mint: Address,
    #[serde(with = "serde_util::int_str")]
    pub liquidity: u128,
    pub lower_price: f64,
    pub upper_price: f64,
    #[serde(default)]
    pub lower_limit_order_price: f64,
    #[serde(default)]
    pub upper_limit_order_price: f64,
    #[serde(default)]
    pub entry_price: f64,
    #[serde(default)]
    pub flags: TunaLpPositionFlags,
    pub mint_a: PositionMint,
    pub mint_b: PositionMint,
    pub pool: PositionPool,
    pub market_maker: PoolProvider,
    pub deposited_collateral_a: AmountWithUsd,
    pub deposited_collateral_b: AmountWithUsd,
    pub leverage: f64,
    #[serde(default)]
    pub liquidation_price_lower: f64,
    #[serde(default)]
    pub liquidation_price_upper: f64,
    pub loan_funds_a: AmountWithUsd,
    pub loan_funds_b: AmountWithUsd,
    pub current_loan_a: AmountWithUsd,
    pub current_loan_b: AmountWithUsd,
    pub leftovers_a: AmountWithUsd,
    pub leftovers_b: AmountWithUsd,
    pub yield_a: AmountWithUsd,
    pub yield_b: AmountWithUsd,
    pub compounded_yield_a: AmountWithUsd,
    pub compounded_yield_b: AmountWithUsd,
    pub total_a: AmountWithUsd,
    pub total_b: AmountWithUsd,
    #[serde(default)]
    pub total_pnl_a: TokensPnl,
    #[serde(default)]
    pub total_pnl_b: TokensPnl,
    #[serde(default)]
    pub pnl_usd: UsdPnl,
    pub opened_at: DateTime<Utc>,
    #[serde(with = "serde_util::int_str")]
    pub updated_at_slot: u64,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

const LP_AMOUNTS: &[&str] = &[
    "depositedCollateralA",
    "depositedCollateralB",
    "loanFundsA",
    "loanFundsB",
    "currentLoanA",
    "currentLoanB",
    "leftoversA",
    "leftoversB",
    "yieldA",
    "yieldB",
    "compoundedYieldA",
    "compoundedYieldB",
    "totalA",
    "totalB",
    "totalPnlA",
    "totalPnlB",
];

pub fn transform_lp(value: &mut Value) {
    with_object(value, |obj| {
        coerce::ints(obj, &["liquidity", "updatedAtSlot"]);
        coerce::amounts(obj, LP_AMOUNTS);
        coerce::dates(obj, &["openedAt", "closedAt"]);
    });
}

// ─── Spot positions ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TunaSpotPositionState {
    Open,
    Closed,
    #[serde(other)]
    Unknown,
}

/// Leveraged spot position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TunaSpotPosition {
    pub address: Address,
    pub authority: Address,
    pub version: u16,
    pub state: TunaSpotPositionState,
    #[serde(default)]
    pub lower_limit_order_price: f64,
    #[serde(default)]
    pub upper_limit_order_price: f64,
    #[serde(default)]
    pub entry_price: f64,
    pub mint_a: Mint,
    pub mint_b: Mint,
    pub pool: PositionPool,
    pub position_token: PoolToken,
    pub collateral_token: PoolToken,
    pub market_maker: PoolProvider,
    pub deposited_collateral: AmountWithUsd,
    pub initial_debt: AmountWithUsd,
    pub current_debt: AmountWithUsd,
    pub total: AmountWithUsd,
    pub leverage: f64,
    #[serde(default)]
    pub max_leverage: f64,
    #[serde(default)]
    pub liquidation_price: f64,
    #[serde(default)]
    pub pnl_usd: UsdPnl,
    pub opened_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

pub fn transform_spot(value: &mut Value) {
    with_object(value, |obj| {
        coerce::amounts(
            obj,
            &["depositedCollateral", "initialDebt", "currentDebt", "total"],
        );
        coerce::dates(obj, &["openedAt", "closedAt"]);
    });
}

// ─── Lending positions ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LendingPosition {
    pub address: Address,
    pub authority: Address,
    pub mint: Address,
    pub vault: Address,
    #[serde(with = "serde_util::int_str")]
    pub shares: u128,
    pub funds: AmountWithUsd,
    pub earned: AmountWithUsd,
}

pub fn transform_lending(value: &mut Value) {
    with_object(value, |obj| {
        coerce::int(obj, "shares");
        coerce::amounts(obj, &["funds", "earned"]);
    });
}
