//! Telemetry Model
//!
//! The client-side view of one status read. Every field is independently
//! optional: the backend may omit any of them, and the renderer substitutes
//! its own defaults rather than failing.

use serde::{Deserialize, Serialize};

/// Latest telemetry reported by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Ergonomics score, nominally 0-100
    pub posture_score: Option<f64>,
    /// Server-supplied label overriding the band message
    pub posture_status_text: Option<String>,
    /// Pre-formatted coding duration (e.g. "12 min")
    pub coding_time: Option<String>,
    /// Stress estimate label (e.g. "Low", "High")
    pub stress_level: Option<String>,
    /// Breaks recorded in the current session
    pub breaks_taken: Option<u32>,
    /// Keys per minute
    pub typing_speed: Option<f64>,
    /// Backend suggests taking a break now
    pub should_break: Option<bool>,
    /// Overall backend status ("Running", "Waiting for webcam...")
    pub service_status: Option<String>,
}

impl TelemetrySnapshot {
    /// Snapshot with only a posture score
    pub fn with_score(score: f64) -> Self {
        Self {
            posture_score: Some(score),
            ..Self::default()
        }
    }

    /// Returns true if the backend reported nothing at all
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Result of a mutating action (record break, reset stats)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ActionResult {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}
