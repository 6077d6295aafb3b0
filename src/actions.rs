//! Action Dispatcher
//!
//! User-triggered mutations: record a break, reset statistics. A successful
//! action shows a notification and forces an immediate extra status read so
//! the panel does not wait for the next tick. Failures are logged and
//! otherwise dropped.

use async_trait::async_trait;
use std::io::Write;
use tokio::io::{AsyncBufRead, Lines};
use tokio::task::JoinHandle;

use crate::client::SharedBackend;
use crate::notification::NotificationTray;
use crate::poller::StatusPoller;

pub const BREAK_RECORDED_MESSAGE: &str = "Break recorded!";
pub const STATS_RESET_MESSAGE: &str = "Stats reset!";
pub const RESET_PROMPT: &str = "Reset all statistics?";

/// Mutating request the user can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    TakeBreak,
    ResetStats,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::TakeBreak => "take_break",
            Action::ResetStats => "reset_stats",
        }
    }

    /// Notification text shown when the backend reports success
    pub fn confirmation_message(&self) -> &'static str {
        match self {
            Action::TakeBreak => BREAK_RECORDED_MESSAGE,
            Action::ResetStats => STATS_RESET_MESSAGE,
        }
    }
}

/// What happened to an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Backend reported success; notification shown, extra poll issued
    Completed,
    /// Backend answered `success: false` or a non-success status
    Rejected { message: Option<String> },
    /// Transport failure or malformed response
    Failed { reason: String },
    /// User declined the confirmation; nothing was sent
    Declined,
}

impl ActionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, ActionOutcome::Completed)
    }
}

/// Yes/no confirmation before a destructive action
#[async_trait]
pub trait Confirm: Send {
    async fn confirm(&mut self, prompt: &str) -> bool;
}

/// Confirmation pre-answered with yes (`--yes`)
pub struct AssumeYes;

#[async_trait]
impl Confirm for AssumeYes {
    async fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

/// Prints the prompt and reads the answer from the next input line
///
/// Anything other than `y`/`yes` (including end of input) declines.
pub struct PromptConfirm<'a, R, W> {
    lines: &'a mut Lines<R>,
    out: W,
}

impl<'a, R, W> PromptConfirm<'a, R, W> {
    pub fn new(lines: &'a mut Lines<R>, out: W) -> Self {
        Self { lines, out }
    }
}

#[async_trait]
impl<'a, R, W> Confirm for PromptConfirm<'a, R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    async fn confirm(&mut self, prompt: &str) -> bool {
        let _ = write!(self.out, "{} [y/N] ", prompt);
        let _ = self.out.flush();

        match self.lines.next_line().await {
            Ok(Some(answer)) => {
                matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
            }
            Ok(None) => false,
            Err(e) => {
                tracing::warn!("Failed to read confirmation: {}", e);
                false
            }
        }
    }
}

/// Runs user actions against the backend
#[derive(Clone)]
pub struct ActionDispatcher {
    backend: SharedBackend,
    poller: StatusPoller,
    notifications: NotificationTray,
}

impl ActionDispatcher {
    pub fn new(
        backend: SharedBackend,
        poller: StatusPoller,
        notifications: NotificationTray,
    ) -> Self {
        Self {
            backend,
            poller,
            notifications,
        }
    }

    /// Record a break
    pub async fn take_break(&self) -> ActionOutcome {
        self.perform(Action::TakeBreak).await
    }

    /// Reset statistics after the user confirms
    pub async fn reset_stats(&self, confirm: &mut dyn Confirm) -> ActionOutcome {
        if !Self::confirm_reset(confirm).await {
            return ActionOutcome::Declined;
        }
        self.perform(Action::ResetStats).await
    }

    /// Ask before resetting; nothing is sent here
    pub async fn confirm_reset(confirm: &mut dyn Confirm) -> bool {
        let confirmed = confirm.confirm(RESET_PROMPT).await;
        if !confirmed {
            tracing::info!("Stats reset declined");
        }
        confirmed
    }

    /// Run an already-confirmed action on its own task
    ///
    /// The caller keeps going while the request is in flight; the
    /// notification and follow-up poll arrive through the tray and the
    /// poller's channel as usual.
    pub fn spawn(&self, action: Action) -> JoinHandle<ActionOutcome> {
        let dispatcher = self.clone();
        tokio::spawn(async move { dispatcher.perform(action).await })
    }

    async fn perform(&self, action: Action) -> ActionOutcome {
        let result = match action {
            Action::TakeBreak => self.backend.record_break().await,
            Action::ResetStats => self.backend.reset_stats().await,
        };

        match result {
            Ok(result) if result.success => {
                tracing::info!(action = action.name(), "Action succeeded");
                self.notifications.show(action.confirmation_message()).await;
                self.poller.poll_once();
                ActionOutcome::Completed
            }
            Ok(result) => {
                tracing::warn!(
                    action = action.name(),
                    message = result.message.as_deref().unwrap_or(""),
                    "Backend rejected action"
                );
                ActionOutcome::Rejected {
                    message: result.message,
                }
            }
            Err(e) => {
                tracing::warn!(action = action.name(), error = %e, "Action failed");
                ActionOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
