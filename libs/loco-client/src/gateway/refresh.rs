//! Single-flight coordination for the token refresh call.

use std::future::Future;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::error::ClientError;

/// Result of one refresh flight, shared with every caller that joined it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Refreshed,
    Failed,
}

/// Ensures at most one refresh call is ever in flight.
///
/// The slot is claimed under a synchronous lock, so two tasks can never
/// both observe "no flight" across a suspension point. A caller that finds
/// a flight already running subscribes to its outcome instead of starting
/// another; on resolution each caller replays its own original request.
pub struct RefreshCoordinator {
    in_flight: Mutex<Option<broadcast::Sender<RefreshOutcome>>>,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self {
            in_flight: Mutex::new(None),
        }
    }

    /// True while a refresh flight is active.
    pub fn in_flight(&self) -> bool {
        self.in_flight.lock().is_some()
    }

    /// Run `refresh` as the single flight, or join the one already running.
    pub async fn run<F, Fut>(&self, refresh: F) -> RefreshOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), ClientError>>,
    {
        let joined = {
            let mut slot = self.in_flight.lock();
            match slot.as_ref() {
                Some(tx) => Some(tx.subscribe()),
                None => {
                    let (tx, _) = broadcast::channel(1);
                    *slot = Some(tx);
                    None
                }
            }
        };

        match joined {
            Some(mut rx) => match rx.recv().await {
                Ok(outcome) => outcome,
                // Sender dropped without broadcasting: the leader was
                // cancelled mid-flight.
                Err(_) => RefreshOutcome::Failed,
            },
            None => self.lead(refresh).await,
        }
    }

    async fn lead<F, Fut>(&self, refresh: F) -> RefreshOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), ClientError>>,
    {
        // Release the slot even if this future is dropped mid-refresh, so a
        // cancelled leader cannot wedge later callers. Disarmed before the
        // normal-path take: by then the slot may already belong to a
        // successor flight.
        struct FlightGuard<'a> {
            coordinator: &'a RefreshCoordinator,
            armed: bool,
        }
        impl Drop for FlightGuard<'_> {
            fn drop(&mut self) {
                if self.armed {
                    self.coordinator.in_flight.lock().take();
                }
            }
        }
        let mut guard = FlightGuard {
            coordinator: self,
            armed: true,
        };

        let outcome = match refresh().await {
            Ok(()) => RefreshOutcome::Refreshed,
            Err(err) => {
                tracing::warn!(?err, "token refresh failed");
                RefreshOutcome::Failed
            }
        };
        guard.armed = false;

        // Clear the slot strictly before broadcasting: joiners must observe
        // the flight as finished before they replay their requests.
        let tx = self.in_flight.lock().take();
        if let Some(tx) = tx {
            let _ = tx.send(outcome);
        }
        outcome
    }
}

impl Default for RefreshCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
