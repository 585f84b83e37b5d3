//! Staking sub-client.

use crate::client::TunaClient;
use crate::domain::staking::{
    transform_history_action, transform_leaderboard, transform_position, transform_treasury,
    StakingLeaderboardPage, StakingPosition, StakingPositionHistoryAction, StakingTreasury,
};
use crate::error::SdkError;
use crate::http::RequestEnvelope;

pub struct Staking<'a> {
    pub(crate) client: &'a TunaClient,
}

impl<'a> Staking<'a> {
    pub async fn treasury(&self) -> Result<StakingTreasury, SdkError> {
        self.client
            .fetch(RequestEnvelope::get("v1/staking/treasury"), transform_treasury)
            .await
    }

    /// Leaderboard page. `page` starts at 1.
    pub async fn leaderboard(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<StakingLeaderboardPage, SdkError> {
        let request = RequestEnvelope::get("v1/staking/leaderboard")
            .query("page", page.to_string())
            .query("pageSize", page_size.to_string());
        self.client.fetch_page(request, transform_leaderboard).await
    }

    pub async fn position(&self, user: &str) -> Result<StakingPosition, SdkError> {
        self.client
            .fetch(
                RequestEnvelope::get(format!("v1/users/{}/staking-position", user)),
                transform_position,
            )
            .await
    }

    pub async fn history(&self, user: &str) -> Result<Vec<StakingPositionHistoryAction>, SdkError> {
        self.client
            .fetch(
                RequestEnvelope::get(format!("v1/users/{}/staking-position/history", user)),
                transform_history_action,
            )
            .await
    }
}
