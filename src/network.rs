//! Network URL constants for the DefiTuna API.

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.defituna.com/api";

/// Path of the server-sent events endpoint, relative to the base URL.
pub const SSE_PATH: &str = "v1/streams/sse";
