//! Server-sent events layer — notification types, framing, demultiplexing.
//!
//! The transport lives in `native.rs` (`sse` feature, tokio + reqwest byte
//! stream). Everything else here is transport-free: [`parser::SseParser`]
//! frames raw bytes and [`demux::Demultiplexer`] turns each frame's data into
//! a classified [`SseEvent`].

pub mod demux;
pub mod parser;
pub mod subscriptions;
pub mod transforms;

#[cfg(feature = "http")]
pub mod client;

#[cfg(feature = "sse")]
pub mod native;

use crate::domain::order::{HistoryUpdate, LimitOrder, OrderHistoryEntry, TradeHistoryEntry};
use crate::domain::pool::{OrderBook, PoolPriceUpdate, PoolSwap};
use crate::domain::position::{LendingPosition, TunaLpPosition, TunaSpotPosition};
use crate::domain::snapshot::StateSnapshot;
use crate::domain::staking::StakingPosition;
use crate::shared::{Address, Value};
use serde::de::{Deserializer, DeserializeOwned};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

#[cfg(feature = "sse")]
pub use native::SseClient;

pub use demux::Demultiplexer;
pub use parser::{SseFrame, SseParser};
pub use subscriptions::{
    PoolSubscription, PoolSubscriptionTopic, SubscriptionPayload, UpdateStreamSubscriptionResult,
    WalletSubscription, WalletSubscriptionTopic,
};

// ─── Entity / action tags ────────────────────────────────────────────────────

/// The `entity` tag of a pushed message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NotificationEntity {
    InitialMessage,
    PoolSwap,
    PoolPrice,
    OrderBook,
    TunaPosition,
    TunaSpotPosition,
    LendingPosition,
    StakingPosition,
    FusionLimitOrder,
    TradeHistoryEntry,
    OrderHistoryEntry,
    StateSnapshot,
    /// A tag this SDK does not know yet.
    Unknown(String),
}

impl NotificationEntity {
    pub fn as_str(&self) -> &str {
        match self {
            NotificationEntity::InitialMessage => "initial_message",
            NotificationEntity::PoolSwap => "pool_swap",
            NotificationEntity::PoolPrice => "pool_price",
            NotificationEntity::OrderBook => "order_book",
            NotificationEntity::TunaPosition => "tuna_position",
            NotificationEntity::TunaSpotPosition => "tuna_spot_position",
            NotificationEntity::LendingPosition => "lending_position",
            NotificationEntity::StakingPosition => "staking_position",
            NotificationEntity::FusionLimitOrder => "fusion_limit_order",
            NotificationEntity::TradeHistoryEntry => "trade_history_entry",
            NotificationEntity::OrderHistoryEntry => "order_history_entry",
            NotificationEntity::StateSnapshot => "state_snapshot",
            NotificationEntity::Unknown(tag) => tag,
        }
    }
}

impl From<&str> for NotificationEntity {
    fn from(tag: &str) -> Self {
        match tag {
            "initial_message" => NotificationEntity::InitialMessage,
            "pool_swap" => NotificationEntity::PoolSwap,
            "pool_price" => NotificationEntity::PoolPrice,
            "order_book" => NotificationEntity::OrderBook,
            "tuna_position" => NotificationEntity::TunaPosition,
            "tuna_spot_position" => NotificationEntity::TunaSpotPosition,
            "lending_position" => NotificationEntity::LendingPosition,
            "staking_position" => NotificationEntity::StakingPosition,
            "fusion_limit_order" => NotificationEntity::FusionLimitOrder,
            "trade_history_entry" => NotificationEntity::TradeHistoryEntry,
            "order_history_entry" => NotificationEntity::OrderHistoryEntry,
            "state_snapshot" => NotificationEntity::StateSnapshot,
            other => NotificationEntity::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for NotificationEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NotificationEntity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NotificationEntity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(NotificationEntity::from(tag.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationAction {
    Create,
    Update,
    #[serde(other)]
    Unknown,
}

// ─── Envelopes ───────────────────────────────────────────────────────────────

/// Common shape of every pushed notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEnvelope<T, M = serde_json::Value> {
    pub entity: NotificationEntity,
    pub action: NotificationAction,
    pub data: T,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub authority: Option<Address>,
    #[serde(default = "Option::default")]
    pub meta: Option<M>,
}

/// Meta attached to order book notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBookMeta {
    pub pool: Address,
    pub price_step: f64,
    #[serde(default)]
    pub inverted: bool,
}

/// A notification whose entity is unknown or whose payload did not match
/// the typed shape. Carries the normalized message as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct RawNotification {
    pub entity: NotificationEntity,
    pub payload: Value,
}

/// A classified notification. Exactly one variant per known entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    PoolSwap(NotificationEnvelope<PoolSwap>),
    PoolPrice(NotificationEnvelope<PoolPriceUpdate>),
    OrderBook(NotificationEnvelope<OrderBook, OrderBookMeta>),
    TunaPosition(NotificationEnvelope<TunaLpPosition>),
    TunaSpotPosition(NotificationEnvelope<TunaSpotPosition>),
    LendingPosition(NotificationEnvelope<LendingPosition>),
    StakingPosition(NotificationEnvelope<StakingPosition>),
    FusionLimitOrder(NotificationEnvelope<LimitOrder>),
    TradeHistoryEntry(NotificationEnvelope<HistoryUpdate<TradeHistoryEntry>>),
    OrderHistoryEntry(NotificationEnvelope<HistoryUpdate<OrderHistoryEntry>>),
    StateSnapshot(Box<NotificationEnvelope<StateSnapshot>>),
    Other(RawNotification),
}

impl Notification {
    pub fn entity(&self) -> NotificationEntity {
        match self {
            Notification::PoolSwap(n) => n.entity.clone(),
            Notification::PoolPrice(n) => n.entity.clone(),
            Notification::OrderBook(n) => n.entity.clone(),
            Notification::TunaPosition(n) => n.entity.clone(),
            Notification::TunaSpotPosition(n) => n.entity.clone(),
            Notification::LendingPosition(n) => n.entity.clone(),
            Notification::StakingPosition(n) => n.entity.clone(),
            Notification::FusionLimitOrder(n) => n.entity.clone(),
            Notification::TradeHistoryEntry(n) => n.entity.clone(),
            Notification::OrderHistoryEntry(n) => n.entity.clone(),
            Notification::StateSnapshot(n) => n.entity.clone(),
            Notification::Other(raw) => raw.entity.clone(),
        }
    }
}

/// First message of every stream: the server-assigned stream id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamInitialMessage {
    pub stream_id: String,
}

/// One classified message.
#[derive(Debug, Clone, PartialEq)]
pub enum SseEvent {
    Initial(StreamInitialMessage),
    Notification(Notification),
}

/// Events emitted by the native client to the consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum SseStreamEvent {
    /// Connection established, response headers received.
    Connected,
    Event(SseEvent),
    /// Stream ended. No automatic reconnect happens.
    Disconnected { reason: String },
    /// A frame that could not be classified, or a transport error.
    Error(String),
}

/// Demultiplexer connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DemuxState {
    #[default]
    Disconnected,
    AwaitingInitialMessage,
    Active,
}

/// Decode a transformed message into a typed envelope.
pub(crate) fn decode_envelope<T, M>(payload: Value) -> Result<NotificationEnvelope<T, M>, String>
where
    T: DeserializeOwned,
    M: DeserializeOwned,
{
    payload.deserialize_into().map_err(|e| e.to_string())
}
