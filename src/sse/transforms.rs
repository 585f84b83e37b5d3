//! Entity transform dispatch and typed classification for notifications.
//!
//! Notification payloads share their wire shape with REST responses, so the
//! same per-entity transforms apply to the `data` slot.

use crate::domain::order::{
    transform_history_update, transform_limit_order, transform_order, transform_trade,
};
use crate::domain::pool::{transform_order_book, transform_price_update, transform_swap};
use crate::domain::position::{transform_lending, transform_lp, transform_spot};
use crate::domain::{snapshot, staking};
use crate::shared::coerce::{self, with_object};
use crate::shared::Value;
use crate::sse::{decode_envelope, Notification, NotificationEntity, RawNotification};

/// Apply the entity's transform to `message.data` in place. Unknown
/// entities pass through untouched.
pub fn apply(entity: &NotificationEntity, message: &mut Value) {
    let transform: fn(&mut Value) = match entity {
        NotificationEntity::PoolSwap => transform_swap,
        NotificationEntity::PoolPrice => transform_price_update,
        NotificationEntity::OrderBook => transform_order_book,
        NotificationEntity::TunaPosition => transform_lp,
        NotificationEntity::TunaSpotPosition => transform_spot,
        NotificationEntity::LendingPosition => transform_lending,
        NotificationEntity::StakingPosition => staking::transform_position,
        NotificationEntity::FusionLimitOrder => transform_limit_order,
        NotificationEntity::TradeHistoryEntry => {
            |v: &mut Value| transform_history_update(v, transform_trade)
        }
        NotificationEntity::OrderHistoryEntry => {
            |v: &mut Value| transform_history_update(v, transform_order)
        }
        NotificationEntity::StateSnapshot => snapshot::transform,
        NotificationEntity::InitialMessage | NotificationEntity::Unknown(_) => return,
    };
    with_object(message, |obj| coerce::nested(obj, "data", transform));
}

/// Classify a transformed message. Unknown entities, and known ones whose
/// payload does not decode, become [`Notification::Other`].
pub fn classify(entity: NotificationEntity, message: Value) -> Notification {
    let payload = message.clone();
    let decoded = match &entity {
        NotificationEntity::PoolSwap => decode_envelope(payload).map(Notification::PoolSwap),
        NotificationEntity::PoolPrice => decode_envelope(payload).map(Notification::PoolPrice),
        NotificationEntity::OrderBook => decode_envelope(payload).map(Notification::OrderBook),
        NotificationEntity::TunaPosition => {
            decode_envelope(payload).map(Notification::TunaPosition)
        }
        NotificationEntity::TunaSpotPosition => {
            decode_envelope(payload).map(Notification::TunaSpotPosition)
        }
        NotificationEntity::LendingPosition => {
            decode_envelope(payload).map(Notification::LendingPosition)
        }
        NotificationEntity::StakingPosition => {
            decode_envelope(payload).map(Notification::StakingPosition)
        }
        NotificationEntity::FusionLimitOrder => {
            decode_envelope(payload).map(Notification::FusionLimitOrder)
        }
        NotificationEntity::TradeHistoryEntry => {
            decode_envelope(payload).map(Notification::TradeHistoryEntry)
        }
        NotificationEntity::OrderHistoryEntry => {
            decode_envelope(payload).map(Notification::OrderHistoryEntry)
        }
        NotificationEntity::StateSnapshot => decode_envelope(payload)
            .map(|envelope| Notification::StateSnapshot(Box::new(envelope))),
        NotificationEntity::InitialMessage | NotificationEntity::Unknown(_) => {
            tracing::debug!("Passing through notification with entity {}", entity);
            return Notification::Other(RawNotification {
                entity: entity.clone(),
                payload: message,
            });
        }
    };

    match decoded {
        Ok(notification) => notification,
        Err(e) => {
            tracing::warn!("Failed to decode {} notification: {}", entity, e);
            Notification::Other(RawNotification {
                entity,
                payload: message,
            })
        }
    }
}
