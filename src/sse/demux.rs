//! Transport-free notification demultiplexer.
//!
//! Each frame is processed to completion before the next one: parse,
//! normalize, run the entity transform, classify. The first message of a
//! stream carries the stream id and moves the demultiplexer to `Active`.

use crate::error::SseError;
use crate::shared::{normalize_value, Value};
use crate::sse::{transforms, DemuxState, NotificationEntity, SseEvent, StreamInitialMessage};

#[derive(Debug, Default)]
pub struct Demultiplexer {
    state: DemuxState,
    stream_id: Option<String>,
}

impl Demultiplexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DemuxState {
        self.state
    }

    /// Stream id captured from the initial message.
    pub fn stream_id(&self) -> Option<&str> {
        self.stream_id.as_deref()
    }

    /// Transport opened. Waits for the initial message.
    pub fn on_open(&mut self) {
        self.state = DemuxState::AwaitingInitialMessage;
        self.stream_id = None;
    }

    /// Transport closed or failed. The captured stream id is dropped.
    pub fn on_close(&mut self) {
        self.state = DemuxState::Disconnected;
        self.stream_id = None;
    }

    /// Classify one message. Unknown entities never fail.
    pub fn process(&mut self, text: &str) -> Result<SseEvent, SseError> {
        if self.state == DemuxState::Disconnected {
            return Err(SseError::NotConnected);
        }

        let raw: serde_json::Value =
            serde_json::from_str(text).map_err(|e| SseError::Parse(e.to_string()))?;
        let mut message = normalize_value(raw);

        let entity = message
            .get("entity")
            .and_then(Value::as_str)
            .map(NotificationEntity::from);

        match entity {
            None | Some(NotificationEntity::InitialMessage) => self.initial(&message),
            Some(entity) => {
                if self.state == DemuxState::AwaitingInitialMessage {
                    tracing::debug!("{} notification before the initial message", entity);
                }
                if let NotificationEntity::Unknown(tag) = &entity {
                    tracing::warn!("Unknown notification entity: {}", tag);
                }
                transforms::apply(&entity, &mut message);
                Ok(SseEvent::Notification(transforms::classify(entity, message)))
            }
        }
    }

    fn initial(&mut self, message: &Value) -> Result<SseEvent, SseError> {
        let stream_id = match message.get("streamId") {
            Some(Value::String(id)) => id.clone(),
            // Purely numeric or base58-looking ids were revived on the way in.
            Some(Value::Integer(n)) => n.to_string(),
            Some(Value::Address(address)) => address.to_string(),
            _ => {
                return Err(SseError::Parse(
                    "initial message without a stream id".to_string(),
                ))
            }
        };

        tracing::info!("SSE stream {} established", stream_id);
        self.stream_id = Some(stream_id.clone());
        self.state = DemuxState::Active;
        Ok(SseEvent::Initial(StreamInitialMessage { stream_id }))
    }
}
