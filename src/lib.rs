//! # DevCare
//!
//! Terminal dashboard for the DevCare ergonomics backend: posture, coding
//! time, stress, breaks and typing speed, refreshed once a second.
//!
//! ## Modules
//!
//! - [`client`]: HTTP access to the telemetry backend
//! - [`poller`]: periodic status reads, last resolved wins
//! - [`view`]: pure rendering of telemetry into the panel
//! - [`actions`]: take a break, reset statistics
//! - [`notification`]: transient on-screen messages
//! - [`session`]: the interactive loop behind `devcare watch`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use devcare::{Config, DashboardView, DevCareClient, PollOutcome, StatusPoller};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let client = Arc::new(DevCareClient::new(config.backend.clone())?);
//!
//!     let outcome = StatusPoller::fetch(client.as_ref()).await;
//!     let mut view = DashboardView::new();
//!     view.apply(&outcome, chrono::Local::now());
//!
//!     if let PollOutcome::Connected(_) = outcome {
//!         println!("{}", view.posture_status);
//!     }
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod client;
pub mod config;
pub mod logging;
pub mod notification;
pub mod poller;
pub mod session;
pub mod telemetry;
pub mod view;

#[cfg(test)]
pub(crate) mod test_support;

pub use actions::{Action, ActionDispatcher, ActionOutcome, AssumeYes, Confirm, PromptConfirm};
pub use client::{
    ClientError, ClientResult, DevCareClient, HealthReport, PayloadShape, SharedBackend,
    StatusBackend,
};
pub use config::{Config, ConfigError, ConfigSearch};
pub use notification::NotificationTray;
pub use poller::{PollOutcome, PollerHandle, StatusPoller};
pub use session::{Command, DashboardSession};
pub use telemetry::{ActionResult, TelemetrySnapshot};
pub use view::{DashboardView, PostureBand};
