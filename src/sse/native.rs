//! Native SSE client — reqwest byte stream on a background tokio task.
//!
//! The task owns the connection, the frame parser and the demultiplexer.
//! Classified events reach the consumer through an mpsc channel exposed as a
//! `Stream`. There is no automatic reconnect: when the stream ends the
//! client reports `Disconnected` and the caller decides what to do.

use std::pin::Pin;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_lock::{Mutex, RwLock};
use futures_util::stream::Stream;
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::{SdkError, SseError};
use crate::http::TunaHttp;
use crate::network::SSE_PATH;
use crate::sse::subscriptions::put_subscription;
use crate::sse::{
    DemuxState, Demultiplexer, SseEvent, SseParser, SseStreamEvent, SubscriptionPayload,
    UpdateStreamSubscriptionResult,
};

const EVENT_CHANNEL_SIZE: usize = 256;

// ─── Shared state between the client and its task ────────────────────────────

#[derive(Default)]
struct Shared {
    state: AtomicU8,
    stream_id: RwLock<Option<String>>,
}

impl Shared {
    fn set_state(&self, state: DemuxState) {
        self.state.store(encode_state(state), Ordering::SeqCst);
    }

    fn state(&self) -> DemuxState {
        decode_state(self.state.load(Ordering::SeqCst))
    }
}

fn encode_state(state: DemuxState) -> u8 {
    match state {
        DemuxState::Disconnected => 0,
        DemuxState::AwaitingInitialMessage => 1,
        DemuxState::Active => 2,
    }
}

fn decode_state(raw: u8) -> DemuxState {
    match raw {
        1 => DemuxState::AwaitingInitialMessage,
        2 => DemuxState::Active,
        _ => DemuxState::Disconnected,
    }
}

// ─── Public SseClient ────────────────────────────────────────────────────────

/// Long-lived notification stream.
///
/// ```ignore
/// let mut sse = client.streams().sse();
/// sse.connect().await?;
/// let mut events = sse.events();
/// while let Some(event) = events.next().await { /* … */ }
/// ```
pub struct SseClient {
    http: TunaHttp,
    shared: Arc<Shared>,
    event_rx: tokio::sync::Mutex<mpsc::Receiver<SseStreamEvent>>,
    event_tx: mpsc::Sender<SseStreamEvent>,
    cancel: Option<CancellationToken>,
    task_handle: Option<JoinHandle<()>>,
    subscription: Mutex<Option<SubscriptionPayload>>,
}

impl SseClient {
    /// Create a client on top of `http`. Does not connect yet.
    pub fn new(http: TunaHttp) -> Self {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_SIZE);
        Self {
            http,
            shared: Arc::new(Shared::default()),
            event_rx: tokio::sync::Mutex::new(event_rx),
            event_tx,
            cancel: None,
            task_handle: None,
            subscription: Mutex::new(None),
        }
    }

    /// Open the stream. Returns once the background task is spawned; the
    /// `Connected` event follows when the server answers.
    pub async fn connect(&mut self) -> Result<(), SseError> {
        if self.task_handle.as_ref().is_some_and(|h| !h.is_finished()) {
            return Ok(());
        }

        let config = self.http.config().await;
        let url = config.resolve_url(SSE_PATH);
        let headers = stream_headers(&config.headers)?;

        let cancel = CancellationToken::new();
        self.cancel = Some(cancel.clone());
        self.shared.set_state(DemuxState::AwaitingInitialMessage);
        *self.shared.stream_id.write().await = None;

        let task = StreamTask {
            client: self.http.inner().clone(),
            url,
            headers,
            event_tx: self.event_tx.clone(),
            shared: Arc::clone(&self.shared),
            cancel,
        };
        self.task_handle = Some(tokio::spawn(task.run()));
        Ok(())
    }

    /// Close the stream and wait for the task to finish.
    pub async fn disconnect(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        if let Some(handle) = self.task_handle.take() {
            let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        }
        self.shared.set_state(DemuxState::Disconnected);
        *self.shared.stream_id.write().await = None;
    }

    pub fn state(&self) -> DemuxState {
        self.shared.state()
    }

    pub fn is_connected(&self) -> bool {
        self.state() != DemuxState::Disconnected
    }

    /// Stream id from the initial message. `None` until it arrived.
    pub async fn stream_id(&self) -> Option<String> {
        self.shared.stream_id.read().await.clone()
    }

    /// Replace the server-side filter of this stream.
    ///
    /// Messages already in flight may still carry the previous topics.
    pub async fn update_subscription(
        &self,
        payload: SubscriptionPayload,
    ) -> Result<UpdateStreamSubscriptionResult, SdkError> {
        let stream_id = self.stream_id().await.ok_or(SseError::StreamIdUnknown)?;
        let result = put_subscription(&self.http, &stream_id, &payload).await?;
        *self.subscription.lock().await = Some(payload);
        Ok(result)
    }

    /// The last subscription the server accepted.
    pub async fn subscription(&self) -> Option<SubscriptionPayload> {
        self.subscription.lock().await.clone()
    }

    /// Events from the stream.
    ///
    /// The returned stream borrows `self`, so it must be dropped
    /// before calling `disconnect()`.
    pub fn events(&self) -> Pin<Box<dyn Stream<Item = SseStreamEvent> + Send + '_>> {
        Box::pin(futures_util::stream::unfold(
            &self.event_rx,
            |rx| async move {
                let mut guard = rx.lock().await;
                guard.recv().await.map(|event| (event, rx))
            },
        ))
    }
}

impl Drop for SseClient {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for SseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SseClient")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

fn stream_headers(client_headers: &[(String, String)]) -> Result<HeaderMap, SseError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("text/event-stream"));
    for (name, value) in client_headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| SseError::ConnectionFailed(format!("invalid header {}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| SseError::ConnectionFailed(format!("invalid header value: {}", e)))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

// ─── Background task ─────────────────────────────────────────────────────────

struct StreamTask {
    client: reqwest::Client,
    url: String,
    headers: HeaderMap,
    event_tx: mpsc::Sender<SseStreamEvent>,
    shared: Arc<Shared>,
    cancel: CancellationToken,
}

impl StreamTask {
    async fn emit(&self, event: SseStreamEvent) {
        if self.event_tx.send(event).await.is_err() {
            tracing::debug!("SSE event receiver dropped");
        }
    }

    async fn run(self) {
        let reason = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => "closed by client".to_string(),
            reason = self.stream() => reason,
        };

        self.shared.set_state(DemuxState::Disconnected);
        *self.shared.stream_id.write().await = None;
        tracing::info!("SSE stream closed: {}", reason);
        self.emit(SseStreamEvent::Disconnected { reason }).await;
    }

    /// Runs until the stream ends. Returns the close reason.
    async fn stream(&self) -> String {
        let response = match self
            .client
            .get(&self.url)
            .headers(self.headers.clone())
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                let error = SseError::ConnectionFailed(format!("HTTP {}", response.status()));
                tracing::error!("SSE connection to {} failed: {}", self.url, error);
                self.emit(SseStreamEvent::Error(error.to_string())).await;
                return error.to_string();
            }
            Err(e) => {
                let error = SseError::ConnectionFailed(e.to_string());
                tracing::error!("SSE connection to {} failed: {}", self.url, error);
                self.emit(SseStreamEvent::Error(error.to_string())).await;
                return error.to_string();
            }
        };

        let mut demux = Demultiplexer::new();
        demux.on_open();
        self.shared.set_state(demux.state());
        tracing::info!("SSE connected to {}", self.url);
        self.emit(SseStreamEvent::Connected).await;

        let mut parser = SseParser::new();
        let mut bytes = response.bytes_stream();

        let reason = loop {
            let chunk = match bytes.next().await {
                Some(Ok(chunk)) => chunk,
                Some(Err(e)) => break SseError::Closed(e.to_string()).to_string(),
                None => break SseError::Closed("server ended the stream".to_string()).to_string(),
            };

            for frame in parser.feed(&chunk) {
                let processed = frame.and_then(|f| demux.process(&f.data));
                match processed {
                    Ok(event) => {
                        if let SseEvent::Initial(initial) = &event {
                            *self.shared.stream_id.write().await = Some(initial.stream_id.clone());
                        }
                        self.shared.set_state(demux.state());
                        self.emit(SseStreamEvent::Event(event)).await;
                    }
                    Err(e) => {
                        tracing::warn!("Dropping SSE frame: {}", e);
                        self.emit(SseStreamEvent::Error(e.to_string())).await;
                    }
                }
            }
        };

        demux.on_close();
        reason
    }
}
