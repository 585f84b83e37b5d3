//! Vaults sub-client.

use crate::client::TunaClient;
use crate::domain::vault::{transform, transform_history, Vault, VaultHistoricalStats};
use crate::error::SdkError;
use crate::http::RequestEnvelope;
use chrono::NaiveDate;

pub struct Vaults<'a> {
    pub(crate) client: &'a TunaClient,
}

impl<'a> Vaults<'a> {
    pub async fn all(&self) -> Result<Vec<Vault>, SdkError> {
        self.client
            .fetch(RequestEnvelope::get("v1/vaults"), transform)
            .await
    }

    pub async fn get(&self, address: &str) -> Result<Vault, SdkError> {
        self.client
            .fetch(RequestEnvelope::get(format!("v1/vaults/{}", address)), transform)
            .await
    }

    /// Daily stats for `[from, to]`.
    pub async fn history(
        &self,
        address: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<VaultHistoricalStats>, SdkError> {
        let request = RequestEnvelope::get(format!("v1/vaults/{}/history", address))
            .query("from", from.format("%Y-%m-%d").to_string())
            .query("to", to.format("%Y-%m-%d").to_string());
        self.client.fetch(request, transform_history).await
    }
}
