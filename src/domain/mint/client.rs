//! Mints sub-client.

use crate::client::TunaClient;
use crate::domain::mint::{transform, Mint};
use crate::error::SdkError;
use crate::http::RequestEnvelope;

pub struct Mints<'a> {
    pub(crate) client: &'a TunaClient,
}

impl<'a> Mints<'a> {
    pub async fn all(&self) -> Result<Vec<Mint>, SdkError> {
        self.client
            .fetch(RequestEnvelope::get("v1/mints"), transform)
            .await
    }

    pub async fn get(&self, mint: &str) -> Result<Mint, SdkError> {
        self.client
            .fetch(RequestEnvelope::get(format!("v1/mints/{}", mint)), transform)
            .await
    }
}
