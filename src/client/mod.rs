//! Backend Access
//!
//! Everything that crosses the HTTP boundary to the telemetry backend.
//!
//! - **StatusBackend**: the seam the poller and action dispatcher talk to
//! - **DevCareClient**: reqwest implementation of that seam
//! - **dto**: nested and flat status payloads and the adapter between them

mod client;
mod dto;
mod error;

pub use client::DevCareClient;
pub use dto::{
    decode_status, detect_shape, BreaksPayload, HealthReport, LegacyStatusPayload, PayloadShape,
    PosturePayload, StatusPayload, TypingPayload,
};
pub use error::{ClientError, ClientResult};

use async_trait::async_trait;
use std::sync::Arc;

use crate::telemetry::{ActionResult, TelemetrySnapshot};

/// Read and mutate operations offered by the telemetry backend
#[async_trait]
pub trait StatusBackend: Send + Sync {
    /// Read the current telemetry
    async fn fetch_status(&self) -> ClientResult<TelemetrySnapshot>;

    /// Record that the user took a break
    async fn record_break(&self) -> ClientResult<ActionResult>;

    /// Reset all session statistics
    async fn reset_stats(&self) -> ClientResult<ActionResult>;
}

/// Backend handle shared between the poller, dispatcher and their tasks
pub type SharedBackend = Arc<dyn StatusBackend>;
