//! View Renderer
//!
//! Pure mapping from (telemetry snapshot, connection flag) to the view state
//! the panel draws. Owns no network handles; every render recomputes the
//! affected fields from scratch so repeated renders never accumulate state.

use chrono::{DateTime, Local};
use serde::Serialize;

use super::band::PostureBand;
use crate::poller::PollOutcome;
use crate::telemetry::TelemetrySnapshot;

pub const BAR_BASE_CLASS: &str = "posture-bar";
pub const INDICATOR_BASE_CLASS: &str = "status-indicator";

pub const DEFAULT_CODING_TIME: &str = "0 min";
pub const DEFAULT_STRESS_LEVEL: &str = "Low";
pub const CONNECTED_LABEL: &str = "Connected";
pub const DISCONNECTED_LABEL: &str = "Disconnected";

const LAST_UPDATE_FORMAT: &str = "%H:%M:%S";

/// Everything the dashboard panel shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// "45/100"
    pub posture_score: String,
    /// Bar fill in percent, clamped to 0-100
    pub posture_bar_width: f64,
    pub posture_bar_classes: Vec<&'static str>,
    pub posture_band: PostureBand,
    pub posture_status: String,
    pub coding_time: String,
    pub stress_level: String,
    pub breaks_taken: String,
    /// "120 keys/min"
    pub typing_speed: String,
    pub break_suggested: bool,
    pub service_status: Option<String>,
    /// Unset until the first poll resolves
    pub connected: Option<bool>,
    pub indicator_classes: Vec<&'static str>,
    pub connection_status: String,
    /// Local time of the last render, successful or not
    pub last_update: Option<String>,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardView {
    /// View before any poll has resolved: every field at its default
    pub fn new() -> Self {
        let mut view = Self {
            posture_score: String::new(),
            posture_bar_width: 0.0,
            posture_bar_classes: Vec::new(),
            posture_band: PostureBand::Calibrating,
            posture_status: String::new(),
            coding_time: String::new(),
            stress_level: String::new(),
            breaks_taken: String::new(),
            typing_speed: String::new(),
            break_suggested: false,
            service_status: None,
            connected: None,
            indicator_classes: vec![INDICATOR_BASE_CLASS],
            connection_status: String::new(),
            last_update: None,
        };
        view.fill_telemetry(&TelemetrySnapshot::default());
        view
    }

    /// Apply one resolved poll
    ///
    /// A failed poll only flips the indicator; the telemetry fields keep
    /// whatever the last successful poll rendered.
    pub fn apply(&mut self, outcome: &PollOutcome, now: DateTime<Local>) {
        match outcome {
            PollOutcome::Connected(snapshot) => {
                self.render(snapshot, now);
                self.set_connection(true);
            }
            PollOutcome::Disconnected { .. } => {
                self.set_connection(false);
                self.stamp(now);
            }
        }
    }

    /// Render a snapshot, substituting defaults for absent fields
    pub fn render(&mut self, snapshot: &TelemetrySnapshot, now: DateTime<Local>) {
        self.fill_telemetry(snapshot);
        self.stamp(now);
    }

    /// Update the connection indicator
    pub fn set_connection(&mut self, connected: bool) {
        self.connected = Some(connected);
        self.indicator_classes.clear();
        self.indicator_classes.push(INDICATOR_BASE_CLASS);
        if connected {
            self.indicator_classes.push("connected");
            self.connection_status = CONNECTED_LABEL.to_string();
        } else {
            self.indicator_classes.push("disconnected");
            self.connection_status = DISCONNECTED_LABEL.to_string();
        }
    }

    fn stamp(&mut self, now: DateTime<Local>) {
        self.last_update = Some(now.format(LAST_UPDATE_FORMAT).to_string());
    }

    fn fill_telemetry(&mut self, snapshot: &TelemetrySnapshot) {
        let score = snapshot.posture_score.unwrap_or(0.0);
        let band = PostureBand::from_score(snapshot.posture_score);

        self.posture_score = format!("{}/100", format_number(score));
        self.posture_bar_width = score.clamp(0.0, 100.0);
        self.posture_bar_classes.clear();
        self.posture_bar_classes.push(BAR_BASE_CLASS);
        self.posture_bar_classes.push(band.css_class());
        self.posture_band = band;
        self.posture_status = band.label(snapshot.posture_status_text.as_deref());

        self.coding_time = snapshot
            .coding_time
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_CODING_TIME.to_string());
        self.stress_level = snapshot
            .stress_level
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_STRESS_LEVEL.to_string());
        self.breaks_taken = snapshot.breaks_taken.unwrap_or(0).to_string();
        self.typing_speed = format!(
            "{} keys/min",
            format_number(snapshot.typing_speed.unwrap_or(0.0))
        );
        self.break_suggested = snapshot.should_break.unwrap_or(false);
        self.service_status = snapshot.service_status.clone().filter(|s| !s.is_empty());
    }
}

/// Render whole numbers without a fractional part ("45", not "45.0")
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
