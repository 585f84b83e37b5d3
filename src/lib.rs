//! # DefiTuna API SDK
//!
//! A Rust client for the DefiTuna backend: REST endpoints, response
//! normalization and the server-sent notification stream.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Value model, case/scalar normalization, domain entities and
//!    their transforms (always available, no I/O)
//! 2. **HTTP API** — `TunaHttp` with request normalization, retries and unwrapping
//! 3. **SSE** — Frame parser, demultiplexer and the native `SseClient`
//! 4. **High-Level Client** — `TunaClient` with nested sub-clients and caching
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use defituna_api::prelude::*;
//!
//! let client = TunaClient::builder()
//!     .base_url("https://api.defituna.com/api")
//!     .build()?;
//!
//! let pools = client.pools().all(None).await?;
//! let positions = client.positions().tuna(&wallet).await?;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared value model, normalization pipeline and newtypes.
pub mod shared;

/// Domain modules (vertical slices): entities, transforms, sub-clients.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Network URL constants.
pub mod network;

// ── Layer 2: HTTP API ────────────────────────────────────────────────────────

/// HTTP client with normalization and retries.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 3: SSE ─────────────────────────────────────────────────────────────

/// Server-sent events: notifications, subscriptions, demultiplexing.
pub mod sse;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `TunaClient` — the primary entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared
    pub use crate::shared::{
        normalize_value, Address, AmountWithUsd, PaginationMeta, PoolProvider, TokensPnl, UsdPnl,
        Value,
    };

    // Domain types
    pub use crate::domain::market::Market;
    pub use crate::domain::mint::Mint;
    pub use crate::domain::oracle::TokenOraclePrice;
    pub use crate::domain::order::{
        HistoryFilter, HistoryUpdate, LimitOrder, LimitOrderState, OrderHistoryEntry,
        TradeHistoryEntry,
    };
    pub use crate::domain::pool::{
        OrderBook, OrderBookEntry, Pool, PoolPriceCandle, PoolPriceUpdate, PoolStats, PoolSwap,
        PoolTicks, Tick,
    };
    pub use crate::domain::position::{
        LendingPosition, TunaLpPosition, TunaPositionState, TunaSpotPosition,
        TunaSpotPositionState,
    };
    pub use crate::domain::snapshot::{PoolSnapshot, StateSnapshot};
    pub use crate::domain::staking::{
        StakingLeaderboardPage, StakingLeaderboardPosition, StakingPosition,
        StakingPositionHistoryAction, StakingTreasury,
    };
    pub use crate::domain::stats::{FeesStatsGroup, StakingRevenueStatsGroup};
    pub use crate::domain::vault::{Vault, VaultHistoricalStats};
    pub use crate::domain::Listing;

    // Errors
    pub use crate::error::{SdkError, SseError};

    // Network
    pub use crate::network::{DEFAULT_API_URL, SSE_PATH};

    // SSE
    pub use crate::sse::{
        DemuxState, Demultiplexer, Notification, NotificationAction, NotificationEntity,
        NotificationEnvelope, PoolSubscription, PoolSubscriptionTopic, SseEvent, SseStreamEvent,
        StreamInitialMessage, SubscriptionPayload, WalletSubscriptionTopic,
    };
    #[cfg(feature = "sse")]
    pub use crate::sse::SseClient;

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{
        MarketsClient, MintsClient, OraclePricesClient, OrdersClient, PoolsClient,
        PositionsClient, StakingClient, StatsClient, StreamsClient, TunaClient, TunaClientBuilder,
        VaultsClient,
    };
    #[cfg(feature = "http")]
    pub use crate::http::{ClientConfig, RequestEnvelope, Response, ResponseStyle, RetryOn, TunaHttp};
}
