//! Posture bands
//!
//! Maps a posture score onto one of four discrete UI states.

use serde::Serialize;
use std::fmt;

pub const EXCELLENT_THRESHOLD: f64 = 80.0;
pub const GOOD_THRESHOLD: f64 = 60.0;

pub const EXCELLENT_MESSAGE: &str = "Excellent posture";
pub const GOOD_MESSAGE: &str = "Good posture";
pub const POOR_MESSAGE: &str = "⚠ Poor posture — sit up straight!";
pub const CALIBRATING_MESSAGE: &str = "Calibrating...";

/// Discrete posture state derived from the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostureBand {
    Calibrating,
    Poor,
    Good,
    Excellent,
}

impl PostureBand {
    /// Classify a score; thresholds are checked top-down, first match wins
    ///
    /// Zero, negative or absent scores mean the backend has no reading yet.
    pub fn from_score(score: Option<f64>) -> Self {
        match score {
            Some(s) if s >= EXCELLENT_THRESHOLD => PostureBand::Excellent,
            Some(s) if s >= GOOD_THRESHOLD => PostureBand::Good,
            Some(s) if s > 0.0 => PostureBand::Poor,
            _ => PostureBand::Calibrating,
        }
    }

    /// Style class applied to the posture bar
    pub fn css_class(&self) -> &'static str {
        match self {
            PostureBand::Calibrating => "calibrating",
            PostureBand::Poor => "poor",
            PostureBand::Good => "good",
            PostureBand::Excellent => "excellent",
        }
    }

    /// Client-side label used when the server sends none
    pub fn default_message(&self) -> &'static str {
        match self {
            PostureBand::Calibrating => CALIBRATING_MESSAGE,
            PostureBand::Poor => POOR_MESSAGE,
            PostureBand::Good => GOOD_MESSAGE,
            PostureBand::Excellent => EXCELLENT_MESSAGE,
        }
    }

    /// Label shown under the score
    ///
    /// Calibrating always uses its own message, ignoring any server label.
    pub fn label(&self, server_text: Option<&str>) -> String {
        match (self, server_text) {
            (PostureBand::Calibrating, _) => CALIBRATING_MESSAGE.to_string(),
            (_, Some(text)) if !text.is_empty() => text.to_string(),
            _ => self.default_message().to_string(),
        }
    }
}

impl fmt::Display for PostureBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PostureBand::Calibrating => "Calibrating",
            PostureBand::Poor => "Poor",
            PostureBand::Good => "Good",
            PostureBand::Excellent => "Excellent",
        };
        f.write_str(name)
    }
}
