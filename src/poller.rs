//! Status Poller
//!
//! Issues one status read immediately and then one per interval for as long
//! as the returned [`PollerHandle`] lives. Every read runs in its own task
//! and reports into a single channel, so reads that overlap are not
//! serialized: whichever resolves last is the last one applied.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::client::{SharedBackend, StatusBackend};
use crate::telemetry::TelemetrySnapshot;

/// Result of one status read, as seen by the renderer
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// HTTP success and a parseable body
    Connected(TelemetrySnapshot),
    /// Transport failure, non-success status or malformed body
    Disconnected { reason: String },
}

impl PollOutcome {
    pub fn is_connected(&self) -> bool {
        matches!(self, PollOutcome::Connected(_))
    }
}

/// Periodic status reader
#[derive(Clone)]
pub struct StatusPoller {
    backend: SharedBackend,
    outcomes: mpsc::UnboundedSender<PollOutcome>,
    interval: Duration,
}

impl StatusPoller {
    /// Create a poller and the receiver its outcomes arrive on
    pub fn new(
        backend: SharedBackend,
        interval: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<PollOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let poller = Self {
            backend,
            outcomes: tx,
            interval,
        };
        (poller, rx)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Perform one status read, converting every failure into `Disconnected`
    pub async fn fetch(backend: &dyn StatusBackend) -> PollOutcome {
        match backend.fetch_status().await {
            Ok(snapshot) => PollOutcome::Connected(snapshot),
            Err(e) => {
                tracing::debug!(error = %e, "Status poll failed");
                PollOutcome::Disconnected {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Spawn one status read outside the timer
    ///
    /// The task is detached; its outcome is delivered through the channel.
    pub fn poll_once(&self) -> JoinHandle<()> {
        let backend = Arc::clone(&self.backend);
        let outcomes = self.outcomes.clone();

        tokio::spawn(async move {
            let outcome = Self::fetch(backend.as_ref()).await;
            // Receiver gone means the view was torn down
            let _ = outcomes.send(outcome);
        })
    }

    /// Start polling: one read now, then one per interval
    pub fn start(&self) -> PollerHandle {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let poller = self.clone();

        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            "Starting status polling"
        );

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poller.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => {
                        tracing::debug!("Status polling stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        // Not awaited: a slow read must not delay the next tick
                        poller.poll_once();
                    }
                }
            }
        });

        PollerHandle {
            token,
            task: Some(task),
        }
    }
}

/// Polling timer scoped to the view's lifetime
///
/// Dropping the handle stops the timer. Reads already in flight are not
/// aborted.
pub struct PollerHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Stop the timer and wait for its task to exit
    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("Polling task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
