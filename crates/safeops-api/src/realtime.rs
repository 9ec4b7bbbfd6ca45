//! Websocket change feed with auto-reconnect.
//!
//! Connects to the backend's `/realtime/v1/stream` endpoint and fans the
//! parsed change envelopes out through a [`tokio::sync::broadcast`]
//! channel. Reconnection with exponential backoff + jitter is handled
//! here, in the client library — consumers only ever see a stream of
//! [`ChangeEvent`]s.
//!
//! # Example
//!
//! ```rust,ignore
//! use safeops_api::realtime::{RealtimeHandle, ReconnectConfig};
//! use tokio_util::sync::CancellationToken;
//! use url::Url;
//!
//! let cancel = CancellationToken::new();
//! let ws_url = Url::parse("wss://backend.safeops.io/realtime/v1/stream")?;
//!
//! let handle = RealtimeHandle::connect(ws_url, ReconnectConfig::default(), cancel.clone(), None);
//! let mut rx = handle.subscribe();
//!
//! while let Ok(event) = rx.recv().await {
//!     println!("{} {:?}", event.relation, event.op);
//! }
//!
//! handle.shutdown();
//! ```

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_tungstenite::tungstenite;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::Error;

// ── Broadcast channel capacity ───────────────────────────────────────

const EVENT_CHANNEL_CAPACITY: usize = 1024;

// ── ChangeEvent ──────────────────────────────────────────────────────

/// The kind of row change a feed event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeOp {
    Insert,
    Update,
    Delete,
}

/// One parsed envelope from the change feed.
///
/// `record` carries the post-change row for inserts/updates,
/// `old_record` the pre-change row for updates/deletes. Consumers that
/// reconcile by full reload ignore both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Relation the change happened in, e.g. `"venues"`.
    pub relation: String,

    pub op: ChangeOp,

    #[serde(default)]
    pub record: Option<serde_json::Value>,

    #[serde(default)]
    pub old_record: Option<serde_json::Value>,

    /// Commit timestamp from the backend, ISO-8601.
    #[serde(default)]
    pub commit_timestamp: Option<String>,
}

// ── ReconnectConfig ──────────────────────────────────────────────────

/// Exponential backoff configuration for feed reconnection.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Delay before the first reconnection attempt. Default: 1s.
    pub initial_delay: Duration,

    /// Upper bound on backoff delay. Default: 60s.
    pub max_delay: Duration,

    /// Maximum reconnection attempts before giving up.
    /// `None` means retry forever.
    pub max_retries: Option<u32>,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            max_retries: None,
        }
    }
}

// ── RealtimeHandle ───────────────────────────────────────────────────

/// Handle to a running change-feed stream.
pub struct RealtimeHandle {
    event_rx: broadcast::Receiver<Arc<ChangeEvent>>,
    cancel: CancellationToken,
}

impl RealtimeHandle {
    /// Spawn the reconnection loop and return immediately.
    ///
    /// The first connection attempt happens asynchronously — subscribe
    /// to the event receiver to start consuming events. If `api_key` is
    /// provided it is appended as an `apikey` query parameter on the
    /// upgrade request.
    pub fn connect(
        mut ws_url: Url,
        reconnect: ReconnectConfig,
        cancel: CancellationToken,
        api_key: Option<String>,
    ) -> Self {
        if let Some(ref key) = api_key {
            ws_url.query_pairs_mut().append_pair("apikey", key);
        }

        let (event_tx, event_rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            feed_loop(ws_url, event_tx, reconnect, task_cancel).await;
        });

        Self { event_rx, cancel }
    }

    /// Get a new broadcast receiver for the change feed.
    ///
    /// Multiple consumers can subscribe concurrently. A consumer that
    /// falls behind receives [`broadcast::error::RecvError::Lagged`].
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<ChangeEvent>> {
        self.event_rx.resubscribe()
    }

    /// Signal the background task to shut down gracefully.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

// ── Background reconnection loop ─────────────────────────────────────

/// Main loop: connect → read → on error, backoff → reconnect.
async fn feed_loop(
    ws_url: Url,
    event_tx: broadcast::Sender<Arc<ChangeEvent>>,
    reconnect: ReconnectConfig,
    cancel: CancellationToken,
) {
    let mut attempt: u32 = 0;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = connect_and_read(&ws_url, &event_tx, &cancel) => {
                match result {
                    // Clean disconnect: reset the counter, reconnect now.
                    Ok(()) => {
                        tracing::info!("change feed disconnected cleanly, reconnecting");
                        attempt = 0;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, attempt, "change feed error");

                        if let Some(max) = reconnect.max_retries {
                            if attempt >= max {
                                tracing::error!(
                                    max_retries = max,
                                    "change feed reconnection limit reached, giving up"
                                );
                                break;
                            }
                        }

                        let delay = backoff_delay(attempt, &reconnect);
                        tracing::info!(
                            delay_ms = delay.as_millis() as u64,
                            attempt,
                            "waiting before reconnect"
                        );

                        tokio::select! {
                            biased;
                            _ = cancel.cancelled() => break,
                            _ = tokio::time::sleep(delay) => {}
                        }

                        attempt += 1;
                    }
                }
            }
        }
    }
}

// ── Single connection lifecycle ──────────────────────────────────────

/// Establish one websocket connection and read frames until it drops.
async fn connect_and_read(
    url: &Url,
    event_tx: &broadcast::Sender<Arc<ChangeEvent>>,
    cancel: &CancellationToken,
) -> Result<(), Error> {
    tracing::info!(url = %url, "connecting to change feed");

    let (ws_stream, _response) = tokio_tungstenite::connect_async(url.as_str())
        .await
        .map_err(|e| Error::RealtimeConnect(e.to_string()))?;

    tracing::info!("change feed connected");

    let (_write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(()),
            frame = read.next() => {
                match frame {
                    Some(Ok(tungstenite::Message::Text(text))) => {
                        parse_and_broadcast(&text, event_tx);
                    }
                    Some(Ok(tungstenite::Message::Ping(_))) => {
                        // tungstenite answers pongs automatically
                        tracing::trace!("change feed ping");
                    }
                    Some(Ok(tungstenite::Message::Close(frame))) => {
                        if let Some(ref cf) = frame {
                            tracing::info!(
                                code = %cf.code,
                                reason = %cf.reason,
                                "change feed close frame received"
                            );
                        } else {
                            tracing::info!("change feed close frame received (no payload)");
                        }
                        return Ok(());
                    }
                    Some(Err(e)) => {
                        return Err(Error::RealtimeConnect(e.to_string()));
                    }
                    None => {
                        tracing::info!("change feed stream ended");
                        return Ok(());
                    }
                    _ => {
                        // Binary, Pong, Frame — ignore
                    }
                }
            }
        }
    }
}

// ── Frame parsing ────────────────────────────────────────────────────

/// Parse one text frame and broadcast every envelope it contains.
///
/// A frame carries either one envelope or an array of envelopes (the
/// backend batches changes committed in the same transaction).
/// Heartbeats and unknown frames are skipped.
fn parse_and_broadcast(text: &str, event_tx: &broadcast::Sender<Arc<ChangeEvent>>) {
    let events: Vec<ChangeEvent> = match serde_json::from_str::<serde_json::Value>(text) {
        Ok(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| decode_envelope(&v))
            .collect(),
        Ok(value) => decode_envelope(&value).into_iter().collect(),
        Err(e) => {
            tracing::debug!(error = %e, "failed to parse change feed frame");
            return;
        }
    };

    for event in events {
        // Send errors just mean no active subscribers right now
        let _ = event_tx.send(Arc::new(event));
    }
}

fn decode_envelope(value: &serde_json::Value) -> Option<ChangeEvent> {
    match serde_json::from_value(value.clone()) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::debug!(error = %e, "skipping non-change frame");
            None
        }
    }
}

// ── Backoff calculation ──────────────────────────────────────────────

/// Exponential backoff with jitter.
///
/// `delay = min(initial * 2^attempt, max) * jitter`, jitter in
/// [0.8, 1.2] derived deterministically from the attempt number so
/// repeated runs stay reproducible.
fn backoff_delay(attempt: u32, config: &ReconnectConfig) -> Duration {
    let base = config.initial_delay.as_secs_f64() * 2.0_f64.powi(attempt.min(16) as i32);
    let capped = base.min(config.max_delay.as_secs_f64());

    let jitter = 1.0 + 0.2 * ((f64::from(attempt) * 12.9898).sin());
    Duration::from_secs_f64((capped * jitter).max(0.0))
}

// ── Tests ────────────────────────────────────────────────────────────
