//! Client configuration shared by every request of one client.

use crate::http::retry::{RetryConfig, RetryOn};
use std::time::Duration;

/// Default per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Default retry ceiling.
pub const DEFAULT_HTTP_RETRIES: u32 = 3;

/// What the style-aware [`TunaHttp::request`](crate::http::TunaHttp::request) hands back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseStyle {
    /// The full `{status, data, error}` envelope.
    #[default]
    Fields,
    /// Only the normalized data slot.
    Data,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL without trailing `/`.
    pub base_url: String,
    /// Per-attempt timeout. Retries each get a fresh one.
    pub timeout: Duration,
    pub http_retries: u32,
    /// Sent with every request, after `content-type` and before call-level headers.
    pub headers: Vec<(String, String)>,
    pub response_style: ResponseStyle,
    /// When `false`, terminal HTTP error statuses come back as
    /// `Ok(Response::failure(..))` instead of `Err`.
    pub throw_on_error: bool,
    pub retry_on: RetryOn,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: crate::network::DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            http_retries: DEFAULT_HTTP_RETRIES,
            headers: Vec::new(),
            response_style: ResponseStyle::Fields,
            throw_on_error: true,
            retry_on: RetryOn::AnyFailure,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: trim_base_url(base_url),
            ..Self::default()
        }
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::new(self.http_retries, self.retry_on)
    }

    /// Absolute `http…` URLs are used as-is, anything else is joined onto the base URL.
    pub fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http") || self.base_url.is_empty() {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

pub(crate) fn trim_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
