//! Positions sub-client — a user's LP, spot and lending positions.

use crate::client::TunaClient;
use crate::domain::position::{
    transform_lending, transform_lp, transform_spot, LendingPosition, TunaLpPosition,
    TunaSpotPosition,
};
use crate::domain::{transform_listing, Listing};
use crate::error::SdkError;
use crate::http::RequestEnvelope;
use crate::shared::Value;

pub struct Positions<'a> {
    pub(crate) client: &'a TunaClient,
}

impl<'a> Positions<'a> {
    /// All leveraged LP positions of a user.
    pub async fn tuna(&self, user: &str) -> Result<Listing<TunaLpPosition>, SdkError> {
        self.client
            .fetch_page(
                RequestEnvelope::get(format!("v1/users/{}/tuna-positions", user)),
                |v: &mut Value| transform_listing(v, transform_lp),
            )
            .await
    }

    pub async fn tuna_by_address(
        &self,
        user: &str,
        address: &str,
    ) -> Result<TunaLpPosition, SdkError> {
        self.client
            .fetch(
                RequestEnvelope::get(format!("v1/users/{}/tuna-positions/{}", user, address)),
                transform_lp,
            )
            .await
    }

    pub async fn spot(&self, user: &str) -> Result<Listing<TunaSpotPosition>, SdkError> {
        self.client
            .fetch_page(
                RequestEnvelope::get(format!("v1/users/{}/spot-positions", user)),
                |v: &mut Value| transform_listing(v, transform_spot),
            )
            .await
    }

    pub async fn lending(&self, user: &str) -> Result<Vec<LendingPosition>, SdkError> {
        self.client
            .fetch(
                RequestEnvelope::get(format!("v1/users/{}/lending-positions", user)),
                transform_lending,
            )
            .await
    }

    pub async fn lending_by_address(
        &self,
        user: &str,
        address: &str,
    ) -> Result<LendingPosition, SdkError> {
        self.client
            .fetch(
                RequestEnvelope::get(format!("v1/users/{}/lending-positions/{}", user, address)),
                transform_lending,
            )
            .await
    }
}
