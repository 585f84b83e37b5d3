//! Stats sub-client.

use crate::client::TunaClient;
use crate::domain::stats::{
    transform_fees, transform_staking_revenue, FeesStatsGroup, StakingRevenueStatsGroup,
};
use crate::error::SdkError;
use crate::http::RequestEnvelope;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

pub struct Stats<'a> {
    pub(crate) client: &'a TunaClient,
}

impl<'a> Stats<'a> {
    /// Fee totals for `[from, to]` grouped by `interval` (`1h`, `1d`, ...).
    pub async fn fees(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        interval: &str,
    ) -> Result<Vec<FeesStatsGroup>, SdkError> {
        let request = RequestEnvelope::get("v1/stats/fees")
            .query("from", from.to_rfc3339_opts(SecondsFormat::Millis, true))
            .query("to", to.to_rfc3339_opts(SecondsFormat::Millis, true))
            .query("interval", interval);
        self.client.fetch(request, transform_fees).await
    }

    /// Daily staking revenue for the calendar days `[from, to]`.
    pub async fn staking_revenue(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<StakingRevenueStatsGroup>, SdkError> {
        let request = RequestEnvelope::get("v1/stats/staking/revenue")
            .query("from", from.format("%Y-%m-%d").to_string())
            .query("to", to.format("%Y-%m-%d").to_string());
        self.client.fetch(request, transform_staking_revenue).await
    }
}
