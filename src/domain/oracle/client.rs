//! Oracle prices sub-client.

use crate::client::TunaClient;
use crate::domain::oracle::{transform, TokenOraclePrice};
use crate::error::SdkError;
use crate::http::RequestEnvelope;

pub struct OraclePrices<'a> {
    pub(crate) client: &'a TunaClient,
}

impl<'a> OraclePrices<'a> {
    pub async fn all(&self) -> Result<Vec<TokenOraclePrice>, SdkError> {
        self.client
            .fetch(RequestEnvelope::get("v1/oracle-prices"), transform)
            .await
    }

    pub async fn get(&self, mint: &str) -> Result<TokenOraclePrice, SdkError> {
        self.client
            .fetch(
                RequestEnvelope::get(format!("v1/oracle-prices/{}", mint)),
                transform,
            )
            .await
    }
}
