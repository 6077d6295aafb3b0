//! Dashboard Session
//!
//! The interactive loop behind `devcare watch`: applies poll outcomes to the
//! view, redraws the panel, and turns input lines into actions. Everything
//! that touches the view happens on this one task.

use chrono::Local;
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::actions::{Action, ActionDispatcher, PromptConfirm};
use crate::client::SharedBackend;
use crate::config::Config;
use crate::notification::NotificationTray;
use crate::poller::{PollOutcome, StatusPoller};
use crate::view::{draw_fullscreen, DashboardView};

/// A line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    TakeBreak,
    ResetStats,
    Quit,
    Unknown(String),
}

impl Command {
    /// Parse an input line; blank lines are ignored
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let command = match line.to_ascii_lowercase().as_str() {
            "b" | "break" => Command::TakeBreak,
            "r" | "reset" => Command::ResetStats,
            "q" | "quit" | "exit" => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        };
        Some(command)
    }
}

/// Live dashboard bound to one output
pub struct DashboardSession<W> {
    view: DashboardView,
    poller: StatusPoller,
    outcomes: mpsc::UnboundedReceiver<PollOutcome>,
    dispatcher: ActionDispatcher,
    notifications: NotificationTray,
    out: W,
}

impl<W: Write + Send> DashboardSession<W> {
    pub fn new(backend: SharedBackend, config: &Config, out: W) -> Self {
        let (poller, outcomes) = StatusPoller::new(backend.clone(), config.poller.interval());
        let notifications = NotificationTray::new(config.notifications.display_duration());
        let dispatcher = ActionDispatcher::new(backend, poller.clone(), notifications.clone());

        Self {
            view: DashboardView::new(),
            poller,
            outcomes,
            dispatcher,
            notifications,
            out,
        }
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }

    /// Apply one resolved poll to the view
    pub fn apply_outcome(&mut self, outcome: &PollOutcome) {
        let was_connected = self.view.connected;
        self.view.apply(outcome, Local::now());

        match (was_connected, outcome) {
            (Some(true), PollOutcome::Connected(_)) => {}
            (_, PollOutcome::Connected(_)) => tracing::info!("Connected to DevCare backend"),
            (Some(false), PollOutcome::Disconnected { .. }) => {}
            (_, PollOutcome::Disconnected { reason }) => {
                tracing::warn!(reason = %reason, "Lost connection to DevCare backend")
            }
        }
    }

    /// Run until `q`, end of `shutdown`, or an output error
    ///
    /// End of input keeps the dashboard polling; only `q` or the shutdown
    /// token end the session. The polling timer stops when this returns.
    /// Break and reset requests run on their own tasks, so polls keep being
    /// applied while they are in flight.
    pub async fn run<R>(mut self, input: R, shutdown: CancellationToken) -> io::Result<DashboardView>
    where
        R: AsyncBufRead + Unpin + Send,
    {
        let polling = self.poller.start();
        let mut lines = input.lines();
        let mut input_open = true;

        self.redraw().await?;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                Some(outcome) = self.outcomes.recv() => {
                    self.apply_outcome(&outcome);
                }
                _ = self.notifications.changed() => {}
                line = lines.next_line(), if input_open => {
                    match line {
                        Ok(Some(line)) => match Command::parse(&line) {
                            Some(Command::TakeBreak) => {
                                self.dispatcher.spawn(Action::TakeBreak);
                            }
                            Some(Command::ResetStats) => {
                                // Only the prompt is modal; the request runs off the loop
                                let mut confirm = PromptConfirm::new(&mut lines, &mut self.out);
                                if ActionDispatcher::confirm_reset(&mut confirm).await {
                                    self.dispatcher.spawn(Action::ResetStats);
                                }
                            }
                            Some(Command::Quit) => break,
                            Some(Command::Unknown(other)) => {
                                tracing::warn!(input = %other, "Unknown command (b, r or q)");
                            }
                            None => {}
                        },
                        Ok(None) => {
                            tracing::debug!("Input closed; dashboard keeps polling");
                            input_open = false;
                        }
                        Err(e) => {
                            tracing::warn!("Failed to read input: {}", e);
                            input_open = false;
                        }
                    }
                }
            }

            self.redraw().await?;
        }

        polling.stop().await;
        Ok(self.view)
    }

    async fn redraw(&mut self) -> io::Result<()> {
        let notifications = self.notifications.active().await;
        write!(self.out, "{}", draw_fullscreen(&self.view, &notifications))?;
        self.out.flush()
    }
}
