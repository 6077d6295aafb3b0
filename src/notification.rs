//! Notification Tray
//!
//! Transient messages shown under the panel. Each message removes itself
//! after the display duration, independently of every other message.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, RwLock};

/// A message currently on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
}

/// Shared set of on-screen notifications
#[derive(Clone)]
pub struct NotificationTray {
    entries: Arc<RwLock<Vec<Notification>>>,
    next_id: Arc<AtomicU64>,
    changed: Arc<Notify>,
    display: Duration,
}

impl NotificationTray {
    pub fn new(display: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            changed: Arc::new(Notify::new()),
            display,
        }
    }

    /// Show a message; it disappears after the display duration
    pub async fn show(&self, message: impl Into<String>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let message = message.into();
        tracing::debug!(id, message = %message, "Showing notification");

        self.entries.write().await.push(Notification { id, message });
        self.changed.notify_one();

        let entries = Arc::clone(&self.entries);
        let changed = Arc::clone(&self.changed);
        let display = self.display;
        tokio::spawn(async move {
            tokio::time::sleep(display).await;
            entries.write().await.retain(|n| n.id != id);
            changed.notify_one();
        });

        id
    }

    /// Messages currently shown, oldest first
    pub async fn active(&self) -> Vec<String> {
        self.entries
            .read()
            .await
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Resolves when a notification appears or expires
    pub async fn changed(&self) {
        self.changed.notified().await;
    }
}
