//! The push channel: one long-lived SSE connection per authenticated
//! session.
//!
//! Lifecycle is `Closed → Connecting → Open → Closed`. Opening waits out a
//! short debounce so a connection is never made against a half-settled
//! client. Every task resumption checks the channel generation, so a
//! superseded or torn-down channel can never dispatch another event.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use loco_common::EventEnvelope;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};

use crate::gateway::request::paths;
use crate::session::Session;

use super::events::{EventRouter, NotificationEvent};
use super::sse::SseParser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Closed,
    Connecting,
    Open,
}

struct ChannelInner {
    state: Mutex<ChannelState>,
    /// Bumped by every connect/disconnect; a task that observes a stale
    /// generation stops touching shared state immediately.
    generation: AtomicU64,
    last_error: Mutex<Option<String>>,
    router: EventRouter,
    task: Mutex<Option<AbortHandle>>,
}

impl ChannelInner {
    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn set_state(&self, generation: u64, state: ChannelState) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        *self.state.lock() = state;
        true
    }

    /// Record a transport failure and close. No automatic reconnect: the
    /// caller (or the session supervisor, after re-login) decides.
    fn fail(&self, generation: u64, message: String) {
        if !self.is_current(generation) {
            return;
        }
        tracing::warn!(error = %message, "notification stream failed");
        self.last_error.lock().replace(message);
        *self.state.lock() = ChannelState::Closed;
    }

    fn handle_payload(&self, payload: &str) {
        let envelope: EventEnvelope = match serde_json::from_str(payload) {
            Ok(envelope) => envelope,
            Err(err) => {
                // Malformed payloads are dropped, never fatal.
                tracing::warn!(?err, "malformed notification payload dropped");
                return;
            }
        };
        match NotificationEvent::from_envelope(envelope) {
            Ok(event) => self.router.dispatch(&event),
            Err(err) => {
                tracing::warn!(?err, "notification payload with unreadable data dropped");
            }
        }
    }
}

/// Cloneable handle; clones share one channel.
#[derive(Clone)]
pub struct NotificationChannel {
    http: reqwest::Client,
    stream_url: String,
    debounce: Duration,
    inner: Arc<ChannelInner>,
}

impl NotificationChannel {
    pub fn new(http: reqwest::Client, base_url: &str, debounce: Duration) -> Self {
        Self {
            http,
            stream_url: format!(
                "{}{}",
                base_url.trim_end_matches('/'),
                paths::NOTIFICATIONS_STREAM
            ),
            debounce,
            inner: Arc::new(ChannelInner {
                state: Mutex::new(ChannelState::Closed),
                generation: AtomicU64::new(0),
                last_error: Mutex::new(None),
                router: EventRouter::new(),
                task: Mutex::new(None),
            }),
        }
    }

    pub fn state(&self) -> ChannelState {
        *self.inner.state.lock()
    }

    /// Most recent transport failure, for diagnostics.
    pub fn last_error(&self) -> Option<String> {
        self.inner.last_error.lock().clone()
    }

    /// Register a callback for one event type. See [`EventRouter::on`].
    pub fn on(
        &self,
        event_type: impl Into<String>,
        handler: impl Fn(&NotificationEvent) + Send + Sync + 'static,
    ) {
        self.inner.router.on(event_type, handler);
    }

    /// Open the stream (after the debounce). Supersedes any previous
    /// channel: the old connection is torn down before the new generation
    /// starts connecting.
    pub fn connect(&self) {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let mut task_slot = self.inner.task.lock();
        if let Some(previous) = task_slot.take() {
            previous.abort();
        }
        *self.inner.state.lock() = ChannelState::Connecting;

        let inner = self.inner.clone();
        let http = self.http.clone();
        let url = self.stream_url.clone();
        let debounce = self.debounce;
        let task = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if !inner.is_current(generation) {
                return;
            }

            let response = match http
                .get(&url)
                .header(reqwest::header::ACCEPT, "text/event-stream")
                .send()
                .await
            {
                Ok(response) if response.status().is_success() => response,
                Ok(response) => {
                    inner.fail(generation, format!("stream rejected: HTTP {}", response.status()));
                    return;
                }
                Err(err) => {
                    inner.fail(generation, err.to_string());
                    return;
                }
            };

            if !inner.set_state(generation, ChannelState::Open) {
                return;
            }
            tracing::debug!(url = %url, "notification stream established");

            let mut parser = SseParser::new();
            let mut body = response.bytes_stream();
            while let Some(chunk) = body.next().await {
                if !inner.is_current(generation) {
                    return;
                }
                match chunk {
                    Ok(bytes) => {
                        for payload in parser.feed(&bytes) {
                            inner.handle_payload(&payload);
                        }
                    }
                    Err(err) => {
                        inner.fail(generation, err.to_string());
                        return;
                    }
                }
            }
            // Server ended the stream cleanly.
            inner.set_state(generation, ChannelState::Closed);
        });
        task_slot.replace(task.abort_handle());
    }

    /// Tear the channel down. Idempotent, callable from any state; no
    /// handler fires afterward.
    pub fn disconnect(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        let mut task_slot = self.inner.task.lock();
        if let Some(previous) = task_slot.take() {
            previous.abort();
        }
        drop(task_slot);
        *self.inner.state.lock() = ChannelState::Closed;
    }

    /// Drive the channel from session transitions: authenticated opens,
    /// anonymous closes. A new login epoch always tears the old channel
    /// down before connecting the new one (handled inside `connect`).
    pub fn watch_session(&self, mut sessions: watch::Receiver<Session>) -> JoinHandle<()> {
        let channel = self.clone();
        tokio::spawn(async move {
            let mut was_authenticated = sessions.borrow_and_update().is_authenticated();
            if was_authenticated {
                channel.connect();
            }
            while sessions.changed().await.is_ok() {
                let authenticated = sessions.borrow_and_update().is_authenticated();
                if authenticated == was_authenticated {
                    continue;
                }
                was_authenticated = authenticated;
                if authenticated {
                    channel.connect();
                } else {
                    channel.disconnect();
                }
            }
            // Session store dropped: tear down with it.
            channel.disconnect();
        })
    }
}
