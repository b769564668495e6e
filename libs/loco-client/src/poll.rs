//! Bounded polling of submission status.
//!
//! The judge works asynchronously and there is no per-submission push, so
//! after submitting the client watches `GET /submissions/{id}` on a fixed
//! interval until a terminal verdict arrives or the attempt budget runs
//! out. Each poll is an explicit state machine driven by a cancellable
//! task; the registry guarantees one live loop per submission id.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use loco_common::Submission;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::config::Config;
use crate::error::ClientError;
use crate::gateway::Gateway;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Polling,
    /// A definitive verdict was observed; the loop stopped on its own.
    Terminal,
    /// The attempt budget ran out before any verdict.
    TimedOut,
    Cancelled,
}

/// What a poll loop reports back to its owner.
#[derive(Debug, Clone)]
pub enum PollEvent {
    /// A fresh observation, terminal or not.
    Status(Submission),
    /// Attempt budget exhausted without a terminal verdict. Deliberately
    /// distinct from any judged verdict.
    TimedOut,
}

#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            interval: config.poll_interval,
            max_attempts: config.poll_max_attempts,
        }
    }
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1000),
            max_attempts: 20,
        }
    }
}

/// State shared between a poll task, its handle, and the registry.
struct PollShared {
    state: Mutex<PollState>,
    cancelled: AtomicBool,
    abort: Mutex<Option<AbortHandle>>,
}

impl PollShared {
    fn new() -> Self {
        Self {
            state: Mutex::new(PollState::Idle),
            cancelled: AtomicBool::new(false),
            abort: Mutex::new(None),
        }
    }

    /// Idempotent, callable from any state. Completed loops keep their
    /// final state; a live loop becomes `Cancelled` and its timer dies.
    fn cancel(&self) {
        if self.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }
        {
            let mut state = self.state.lock();
            if matches!(*state, PollState::Idle | PollState::Polling) {
                *state = PollState::Cancelled;
            }
        }
        if let Some(abort) = self.abort.lock().take() {
            abort.abort();
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Owner's view of one running poll loop.
pub struct PollHandle {
    submission_id: i64,
    shared: Arc<PollShared>,
    events: mpsc::UnboundedReceiver<PollEvent>,
}

impl PollHandle {
    pub fn submission_id(&self) -> i64 {
        self.submission_id
    }

    pub fn state(&self) -> PollState {
        *self.shared.state.lock()
    }

    /// Next event, or `None` once the loop has stopped and drained. After
    /// [`PollHandle::cancel`], no further event is ever delivered.
    pub async fn recv(&mut self) -> Option<PollEvent> {
        self.events.recv().await
    }

    pub fn cancel(&self) {
        self.shared.cancel();
    }
}

/// Spawn a poll loop over an arbitrary status source.
///
/// Generic over the fetch so the state machine can be driven under virtual
/// time in tests; production wiring goes through [`PollRegistry`], which
/// supplies the gateway-backed fetch.
fn spawn_poll<F, Fut>(submission_id: i64, options: PollOptions, fetch: F) -> PollHandle
where
    F: Fn(i64) -> Fut + Send + 'static,
    Fut: Future<Output = Result<Submission, ClientError>> + Send,
{
    let (tx, events) = mpsc::unbounded_channel();
    let shared = Arc::new(PollShared::new());
    // Idle only ever exists before this point; the handle comes back live.
    *shared.state.lock() = PollState::Polling;

    let task_shared = shared.clone();
    let task = tokio::spawn(async move {
        for attempt in 1..=options.max_attempts {
            tokio::time::sleep(options.interval).await;
            if task_shared.is_cancelled() {
                return;
            }
            match fetch(submission_id).await {
                // Every resumption re-checks cancellation before acting on
                // the result: a late response must not fire callbacks.
                Ok(submission) => {
                    if task_shared.is_cancelled() {
                        return;
                    }
                    let terminal = submission.status.is_terminal();
                    let _ = tx.send(PollEvent::Status(submission));
                    if terminal {
                        *task_shared.state.lock() = PollState::Terminal;
                        return;
                    }
                }
                Err(err) => {
                    if task_shared.is_cancelled() {
                        return;
                    }
                    // Transient failure consumes the attempt, nothing more.
                    tracing::debug!(?err, submission_id, attempt, "poll tick failed");
                }
            }
        }
        if task_shared.is_cancelled() {
            return;
        }
        *task_shared.state.lock() = PollState::TimedOut;
        let _ = tx.send(PollEvent::TimedOut);
    });
    shared.abort.lock().replace(task.abort_handle());

    PollHandle {
        submission_id,
        shared,
        events,
    }
}

/// All live poll loops, keyed by submission id.
pub struct PollRegistry {
    gateway: Arc<Gateway>,
    defaults: PollOptions,
    active: DashMap<i64, Arc<PollShared>>,
}

impl PollRegistry {
    pub fn new(gateway: Arc<Gateway>, defaults: PollOptions) -> Self {
        Self {
            gateway,
            defaults,
            active: DashMap::new(),
        }
    }

    /// Start polling a submission with the configured defaults.
    pub fn start(&self, submission_id: i64) -> PollHandle {
        self.start_with(submission_id, self.defaults)
    }

    /// Start polling with explicit options. If a loop for this submission
    /// is already live it is cancelled first: never two timers per id.
    pub fn start_with(&self, submission_id: i64, options: PollOptions) -> PollHandle {
        if let Some((_, previous)) = self.active.remove(&submission_id) {
            previous.cancel();
        }

        let gateway = self.gateway.clone();
        let handle = spawn_poll(submission_id, options, move |id| {
            let gateway = gateway.clone();
            async move { crate::api::submissions::get(&gateway, id).await }
        });
        self.active.insert(submission_id, handle.shared.clone());
        handle
    }

    /// Cancel the loop for a submission, if one is live.
    pub fn cancel(&self, submission_id: i64) -> bool {
        match self.active.remove(&submission_id) {
            Some((_, shared)) => {
                shared.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel everything (teardown).
    pub fn cancel_all(&self) {
        self.active.retain(|_, shared| {
            shared.cancel();
            false
        });
    }
}
