//! Staking domain — treasury, user staking positions and their history.

#[cfg(feature = "http")]
pub mod client;

use crate::shared::coerce::{self, with_object};
use crate::shared::{serde_util, AmountWithUsd, Address, PaginationMeta, Value};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakingTreasury {
    pub address: Address,
    pub staked_token_mint: Address,
    pub reward_token_mint: Address,
    pub apy: f64,
    pub total_staked: AmountWithUsd,
    pub total_reward: AmountWithUsd,
    pub unstake_cooldown_seconds: u64,
}

pub fn transform_treasury(value: &mut Value) {
    with_object(value, |obj| coerce::amounts(obj, &["totalStaked", "totalReward"]));
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakingVesting {
    pub locked: AmountWithUsd,
    pub unlocked: AmountWithUsd,
    #[serde(with = "serde_util::int_str")]
    pub unlock_rate: u64,
    pub unlock_every_seconds: u64,
    pub unlock_cliff_seconds: u64,
    #[serde(default)]
    pub locked_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakingPosition {
    pub address: Address,
    pub owner: Address,
    pub staked: AmountWithUsd,
    pub unstaked: AmountWithUsd,
    pub claimed_reward: AmountWithUsd,
    pub unclaimed_reward: AmountWithUsd,
    pub vesting: StakingVesting,
    #[serde(default)]
    pub last_unstaked_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub withdraw_available_at: Option<DateTime<Utc>>,
}

pub fn transform_position(value: &mut Value) {
    with_object(value, |obj| {
        coerce::amounts(
            obj,
            &["staked", "unstaked", "claimedReward", "unclaimedReward"],
        );
        coerce::dates(obj, &["lastUnstakedAt", "withdrawAvailableAt"]);
        coerce::nested(obj, "vesting", |vesting| {
            with_object(vesting, |v| {
                coerce::amounts(v, &["locked", "unlocked"]);
                coerce::int(v, "unlockRate");
                coerce::date(v, "lockedAt");
            })
        });
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StakingActionType {
    Stake,
    Unstake,
    Withdraw,
    ClaimRewards,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakingPositionHistoryAction {
    pub position: Address,
    pub action: StakingActionType,
    pub tx_signature: String,
    #[serde(with = "serde_util::int_str")]
    pub amount: u64,
    pub time: DateTime<Utc>,
}

pub fn transform_history_action(value: &mut Value) {
    with_object(value, |obj| {
        coerce::int(obj, "amount");
        coerce::date(obj, "time");
    });
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakingLeaderboardPosition {
    #[serde(default)]
    pub rank: u32,
    pub address: Address,
    pub owner: Address,
    pub staked: AmountWithUsd,
}

/// One page of the leaderboard. Returned at the root, not under `data`.
///
/// A page without `meta` collapses to its bare entry array on unwrap; both
/// shapes are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "LeaderboardRepr")]
pub struct StakingLeaderboardPage {
    pub data: Vec<StakingLeaderboardPosition>,
    pub meta: Option<PaginationMeta>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LeaderboardRepr {
    Page {
        data: Vec<StakingLeaderboardPosition>,
        #[serde(default)]
        meta: Option<PaginationMeta>,
    },
    Bare(Vec<StakingLeaderboardPosition>),
}

impl From<LeaderboardRepr> for StakingLeaderboardPage {
    fn from(repr: LeaderboardRepr) -> Self {
        match repr {
            LeaderboardRepr::Page { data, meta } => Self { data, meta },
            LeaderboardRepr::Bare(data) => Self { data, meta: None },
        }
    }
}

fn transform_leaderboard_entry(value: &mut Value) {
    with_object(value, |e| coerce::amount(e, "staked"));
}

pub fn transform_leaderboard(value: &mut Value) {
    match value {
        Value::Array(entries) => entries.iter_mut().for_each(transform_leaderboard_entry),
        other => with_object(other, |obj| {
            coerce::each(obj, "data", transform_leaderboard_entry)
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::normalize_value;
    use serde_json::json;

    const USER: &str = "HJPjoWUrhoZzkNfRpHuieeFk9WcZWjwy6PBjZ81ngndJ";
    const POS: &str = "Czfq3xZZDmsdGdUyrNLtRhGc47cXcZtLG4crryfu44zE";

    #[test]
    fn test_staking_position_vesting() {
        let mut v = normalize_value(json!({
            "address": POS,
            "owner": USER,
            "staked": {"amount": "5000000", "usd": 5.0},
            "unstaked": {"amount": 0, "usd": 0.0},
            "claimed_reward": {"amount": "10", "usd": 0.0},
            "unclaimed_reward": {"amount": "20", "usd": 0.0},
            "vesting": {
                "locked": {"amount": "100", "usd": 0.0},
                "unlocked": {"amount": "0", "usd": 0.0},
                "unlock_rate": 7,
                "unlock_every_seconds": 86400,
                "unlock_cliff_seconds": 0,
                "locked_at": "2025-01-01T00:00:00Z"
            },
            "last_unstaked_at": null,
            "withdraw_available_at": null
        }));
        transform_position(&mut v);
        assert_eq!(
            v.get("vesting").and_then(|x| x.get("unlockRate")),
            Some(&Value::Integer(7))
        );
        let position: StakingPosition = v.deserialize_into().unwrap();
        assert_eq!(position.staked.amount, 5_000_000);
        assert_eq!(position.vesting.locked.amount, 100);
        assert!(position.vesting.locked_at.is_some());
        assert!(position.last_unstaked_at.is_none());
    }

    #[test]
    fn test_history_action() {
        let mut v = normalize_value(json!({
            "position": POS,
            "action": "claim_rewards",
            "tx_signature": "sig",
            "amount": 123,
            "time": "2025-04-01T12:30:00Z"
        }));
        transform_history_action(&mut v);
        assert_eq!(v.get("amount"), Some(&Value::Integer(123)));
        let action: StakingPositionHistoryAction = v.deserialize_into().unwrap();
        assert_eq!(action.action, StakingActionType::ClaimRewards);
        assert_eq!(action.amount, 123);
    }

    #[test]
    fn test_leaderboard_page() {
        let mut v = normalize_value(json!({
            "data": [{"rank": 1, "address": POS, "owner": USER, "staked": {"amount": "9", "usd": 1.0}}],
            "meta": {"total": 1}
        }));
        transform_leaderboard(&mut v);
        let page: StakingLeaderboardPage = v.deserialize_into().unwrap();
        assert_eq!(page.data[0].staked.amount, 9);
        assert_eq!(page.meta.map(|m| m.total), Some(1));
    }
}
