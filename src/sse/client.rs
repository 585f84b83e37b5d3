//! Streams sub-client — subscription updates and the SSE connection.

use crate::client::TunaClient;
use crate::error::SdkError;
use crate::sse::subscriptions::put_subscription;
use crate::sse::{SubscriptionPayload, UpdateStreamSubscriptionResult};

pub struct Streams<'a> {
    pub(crate) client: &'a TunaClient,
}

impl<'a> Streams<'a> {
    /// Replace the server-side filter of stream `stream_id`.
    pub async fn update_subscription(
        &self,
        stream_id: &str,
        payload: &SubscriptionPayload,
    ) -> Result<UpdateStreamSubscriptionResult, SdkError> {
        put_subscription(self.client.http(), stream_id, payload).await
    }

    /// A new, unconnected SSE client sharing this client's configuration.
    #[cfg(feature = "sse")]
    pub fn sse(&self) -> crate::sse::native::SseClient {
        crate::sse::native::SseClient::new(self.client.http().clone())
    }
}
