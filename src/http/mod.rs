//! HTTP client layer — `TunaHttp` with normalization, retry and unwrapping.

pub mod client;
pub mod config;
pub mod request;
pub mod response;
pub mod retry;
pub mod unwrap;

pub use client::{Reply, TunaHttp};
pub use config::{ClientConfig, ResponseStyle};
pub use request::{normalize_request, Body, QueryValue, RequestEnvelope};
pub use response::{normalize_response, parse_body, Response};
pub use retry::{RetryConfig, RetryOn};
pub use unwrap::{collapse_data, unwrap, unwrap_into};
