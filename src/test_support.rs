//! In-memory backend for unit tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::client::{ClientError, ClientResult, SharedBackend, StatusBackend};
use crate::telemetry::{ActionResult, TelemetrySnapshot};

/// Scripted reply to a status read
pub(crate) enum StatusReply {
    Ok(TelemetrySnapshot),
    Fail,
}

#[derive(Default)]
pub(crate) struct MockBackend {
    /// Answer used when the script is empty; `None` fails the read
    status: Mutex<Option<TelemetrySnapshot>>,
    /// One-shot replies consumed in call order, each after its delay
    script: Mutex<VecDeque<(Duration, StatusReply)>>,
    /// `None` makes actions fail at the transport level
    action_success: Mutex<Option<bool>>,
    /// How long break/reset take to answer
    action_delay: Mutex<Duration>,
    pub status_calls: AtomicUsize,
    pub break_calls: AtomicUsize,
    pub reset_calls: AtomicUsize,
}

impl MockBackend {
    pub fn connected(snapshot: TelemetrySnapshot) -> Arc<Self> {
        let backend = Self::default();
        *backend.status.lock().unwrap() = Some(snapshot);
        *backend.action_success.lock().unwrap() = Some(true);
        Arc::new(backend)
    }

    pub fn unreachable() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_action_success(&self, success: Option<bool>) {
        *self.action_success.lock().unwrap() = success;
    }

    pub fn set_action_delay(&self, delay: Duration) {
        *self.action_delay.lock().unwrap() = delay;
    }

    pub fn push_reply(&self, delay: Duration, reply: StatusReply) {
        self.script.lock().unwrap().push_back((delay, reply));
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn shared(self: &Arc<Self>) -> SharedBackend {
        Arc::clone(self) as SharedBackend
    }

    async fn action_result(&self) -> ClientResult<ActionResult> {
        let delay = *self.action_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let success = *self.action_success.lock().unwrap();
        match success {
            Some(success) => Ok(ActionResult {
                success,
                message: None,
            }),
            None => Err(ClientError::Unavailable),
        }
    }
}

#[async_trait]
impl StatusBackend for MockBackend {
    async fn fetch_status(&self) -> ClientResult<TelemetrySnapshot> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);

        let scripted = self.script.lock().unwrap().pop_front();
        if let Some((delay, reply)) = scripted {
            tokio::time::sleep(delay).await;
            return match reply {
                StatusReply::Ok(snapshot) => Ok(snapshot),
                StatusReply::Fail => Err(ClientError::Timeout),
            };
        }

        let current = self.status.lock().unwrap().clone();
        current.ok_or(ClientError::Unavailable)
    }

    async fn record_break(&self) -> ClientResult<ActionResult> {
        self.break_calls.fetch_add(1, Ordering::SeqCst);
        self.action_result().await
    }

    async fn reset_stats(&self) -> ClientResult<ActionResult> {
        self.reset_calls.fetch_add(1, Ordering::SeqCst);
        self.action_result().await
    }
}
