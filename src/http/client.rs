//! Low-level HTTP client — `TunaHttp`.
//!
//! Normalizes the outgoing envelope, sends it with a per-attempt timeout,
//! retries with jittered exponential backoff and normalizes whatever comes
//! back. Domain sub-clients sit on top of this.

use crate::error::SdkError;
use crate::http::config::{trim_base_url, ClientConfig, ResponseStyle};
use crate::http::request::{normalize_request, Body, RequestEnvelope};
use crate::http::response::{is_success_status, normalize_response, parse_body, Response};
use crate::shared::Value;

use async_lock::RwLock;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Style-dependent result of [`TunaHttp::request`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Fields(Response),
    Data(Option<Value>),
}

impl From<Reply> for Response {
    fn from(reply: Reply) -> Self {
        match reply {
            Reply::Fields(response) => response,
            Reply::Data(data) => Response::success(200, data),
        }
    }
}

/// Low-level HTTP client for the DefiTuna REST API.
#[derive(Clone)]
pub struct TunaHttp {
    client: Client,
    config: Arc<RwLock<ClientConfig>>,
}

impl TunaHttp {
    pub fn new(config: ClientConfig) -> Result<Self, SdkError> {
        let client = Client::builder()
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| SdkError::Validation(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: Arc::new(RwLock::new(config)),
        })
    }

    /// Snapshot of the current configuration.
    pub async fn config(&self) -> ClientConfig {
        self.config.read().await.clone()
    }

    /// Replace the configuration. Requests already in flight keep the
    /// snapshot they started with.
    pub async fn set_config(&self, mut config: ClientConfig) {
        config.base_url = trim_base_url(&config.base_url);
        *self.config.write().await = config;
    }

    pub async fn set_base_url(&self, url: &str) {
        self.config.write().await.base_url = trim_base_url(url);
    }

    pub async fn base_url(&self) -> String {
        self.config.read().await.base_url.clone()
    }

    pub(crate) fn inner(&self) -> &Client {
        &self.client
    }

    /// Execute and shape the result according to the configured [`ResponseStyle`].
    pub async fn request(&self, envelope: RequestEnvelope) -> Result<Reply, SdkError> {
        let style = self.config.read().await.response_style;
        let response = self.execute(envelope).await?;
        Ok(match style {
            ResponseStyle::Fields => Reply::Fields(response),
            ResponseStyle::Data => Reply::Data(response.data),
        })
    }

    /// Execute and return only the normalized data slot.
    pub async fn execute_data(&self, envelope: RequestEnvelope) -> Result<Option<Value>, SdkError> {
        let response = self.execute(envelope).await?;
        match response.error {
            Some(cause) => Err(SdkError::api(response.status, cause)),
            None => Ok(response.data),
        }
    }

    /// Execute `envelope` with retries.
    ///
    /// Every attempt resends the same normalized envelope. Cancellation and
    /// timeout end the call immediately; other failures are retried while the
    /// policy allows, then surfaced.
    pub async fn execute(&self, envelope: RequestEnvelope) -> Result<Response, SdkError> {
        let config = self.config.read().await.clone();
        let retry = config.retry_config();
        let cancel = envelope.cancel.clone();

        if cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
            return Err(aborted());
        }

        let request = normalize_request(&envelope);
        let url = request_url(&config, &request);
        let timeout = request.timeout.unwrap_or(config.timeout);
        let headers = merge_headers(&config.headers, &request)?;

        let mut backoff = retry.initial_backoff();
        let mut attempt: u32 = 0;

        loop {
            let result = tokio::select! {
                biased;
                _ = cancelled(cancel.as_ref()) => Err(aborted()),
                _ = futures_timer::Delay::new(timeout) => Err(SdkError::Timeout {
                    after_ms: timeout.as_millis() as u64,
                }),
                r = self.do_request(&request, &url, headers.clone()) => r,
            };

            let error = match result {
                Ok(response) => return Ok(response),
                Err(e) => e,
            };

            if error.is_abort() {
                tracing::debug!("Request to {} aborted: {}", url, error);
                return Err(error);
            }

            if attempt >= retry.max_retries || !retry.should_retry(&error) {
                tracing::warn!(
                    attempts = attempt + 1,
                    status = error.status(),
                    "Request to {} failed: {}",
                    url,
                    error
                );
                return finish(error, config.throw_on_error);
            }

            attempt += 1;
            tracing::debug!(
                attempt,
                max = retry.max_retries,
                delay_ms = backoff.as_millis() as u64,
                "Retrying request to {}: {}",
                url,
                error
            );

            tokio::select! {
                biased;
                _ = cancelled(cancel.as_ref()) => return Err(aborted()),
                _ = futures_timer::Delay::new(backoff) => {}
            }
            backoff = retry.next_backoff(backoff);
        }
    }

    async fn do_request(
        &self,
        request: &RequestEnvelope,
        url: &str,
        headers: HeaderMap,
    ) -> Result<Response, SdkError> {
        let mut req = self
            .client
            .request(request.method.clone(), url)
            .headers(headers);

        match &request.body {
            Some(Body::Json(json)) => req = req.body(serde_json::to_vec(json)?),
            Some(Body::Raw { bytes, .. }) => req = req.body(bytes.clone()),
            None => {}
        }

        let resp = req.send().await.map_err(SdkError::network)?;
        let status = resp.status().as_u16();
        let bytes = resp.bytes().await.map_err(SdkError::network)?;
        let data = normalize_response(parse_body(&bytes));

        if is_success_status(status) {
            Ok(Response::success(status, data))
        } else {
            Err(SdkError::api(status, data.unwrap_or_default()))
        }
    }
}

fn aborted() -> SdkError {
    SdkError::aborted("request cancelled by caller")
}

/// Resolves when `token` is cancelled, never when there is no token.
async fn cancelled(token: Option<&CancellationToken>) {
    match token {
        Some(token) => token.cancelled().await,
        None => std::future::pending::<()>().await,
    }
}

/// Terminal failure. HTTP statuses may be handed back as data.
fn finish(error: SdkError, throw_on_error: bool) -> Result<Response, SdkError> {
    match error {
        SdkError::Api { status, cause, .. } if !throw_on_error => {
            Ok(Response::failure(status, Some(cause)))
        }
        other => Err(other),
    }
}

fn request_url(config: &ClientConfig, request: &RequestEnvelope) -> String {
    let url = config.resolve_url(&request.url);
    let query = request.query_string();
    if query.is_empty() {
        url
    } else if url.contains('?') {
        format!("{}&{}", url, query)
    } else {
        format!("{}?{}", url, query)
    }
}

/// `content-type` default, then client-level headers, then call-level
/// headers. Later layers replace earlier ones.
fn merge_headers(
    client_headers: &[(String, String)],
    request: &RequestEnvelope,
) -> Result<HeaderMap, SdkError> {
    let content_type = match &request.body {
        Some(Body::Raw { content_type, .. }) => content_type.as_str(),
        _ => "application/json",
    };

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, header_value(content_type)?);
    for (name, value) in client_headers.iter().chain(request.headers.iter()) {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| SdkError::Validation(format!("invalid header name {}: {}", name, e)))?;
        headers.insert(name, header_value(value)?);
    }
    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue, SdkError> {
    HeaderValue::from_str(value)
        .map_err(|e| SdkError::Validation(format!("invalid header value {}: {}", value, e)))
}

impl std::fmt::Debug for TunaHttp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TunaHttp").finish_non_exhaustive()
    }
}
