//! Outgoing request envelope and its normalizer.
//!
//! Callers build a [`RequestEnvelope`] in application casing (camelCase body
//! and query keys). [`normalize_request`] produces the wire-cased copy the
//! client actually sends.

use crate::error::SdkError;
use crate::shared::casing::{snakify_json, snakify_key};
use reqwest::Method;
use serde::Serialize;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Request body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// JSON document. Keys are snake_cased on the way out.
    Json(serde_json::Value),
    /// Opaque payload (binary, multipart). Sent untouched.
    Raw {
        bytes: Vec<u8>,
        content_type: String,
    },
}

/// A query parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    One(String),
    /// Array parameter. Sent once as a comma-joined value (`style=form, explode=false`).
    Many(Vec<String>),
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::One(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::One(s)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(v: Vec<String>) -> Self {
        QueryValue::Many(v)
    }
}

impl QueryValue {
    fn flattened(&self) -> String {
        match self {
            QueryValue::One(s) => s.clone(),
            QueryValue::Many(items) => items.join(","),
        }
    }
}

/// Everything needed to issue one logical call, retries included.
#[derive(Debug, Clone)]
pub struct RequestEnvelope {
    pub method: Method,
    /// Path relative to the configured base URL, or an absolute `http…` URL.
    pub url: String,
    /// Call-level headers. Win over client-level headers.
    pub headers: Vec<(String, String)>,
    pub body: Option<Body>,
    pub query: Vec<(String, QueryValue)>,
    /// Caller cancellation. Takes precedence over the timeout.
    pub cancel: Option<CancellationToken>,
    /// Per-call timeout override.
    pub timeout: Option<Duration>,
}

impl RequestEnvelope {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            query: Vec::new(),
            cancel: None,
            timeout: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn query(mut self, key: &str, value: impl Into<QueryValue>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    /// Add a query parameter only when `value` is `Some`.
    pub fn query_opt<V: Into<QueryValue>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    /// Serialize `body` as the JSON payload.
    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, SdkError> {
        self.body = Some(Body::Json(serde_json::to_value(body)?));
        Ok(self)
    }

    pub fn raw(mut self, bytes: Vec<u8>, content_type: &str) -> Self {
        self.body = Some(Body::Raw {
            bytes,
            content_type: content_type.to_string(),
        });
        self
    }

    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Percent-encoded `k=v&k=v` query string, without the leading `?`.
    pub fn query_string(&self) -> String {
        self.query
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    urlencoding::encode(k),
                    urlencoding::encode(&v.flattened())
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Produce the wire-cased copy of `envelope`. The input is never modified.
///
/// JSON body keys and query keys are snake_cased deeply, array query values
/// are flattened to one comma-joined value, raw bodies pass through.
pub fn normalize_request(envelope: &RequestEnvelope) -> RequestEnvelope {
    let body = envelope.body.as_ref().map(|body| match body {
        Body::Json(json) => Body::Json(snakify_json(json.clone())),
        raw @ Body::Raw { .. } => raw.clone(),
    });

    let query = envelope
        .query
        .iter()
        .map(|(k, v)| (snakify_key(k), QueryValue::One(v.flattened())))
        .collect();

    RequestEnvelope {
        method: envelope.method.clone(),
        url: envelope.url.clone(),
        headers: envelope.headers.clone(),
        body,
        query,
        cancel: envelope.cancel.clone(),
        timeout: envelope.timeout,
    }
}
