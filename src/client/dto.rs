//! Wire Types
//!
//! Status payloads as the backend sends them. Two shapes exist in deployed
//! backends: the nested `/api/status` shape (canonical) and the older flat
//! `/status` shape, which is adapted into the nested one before conversion.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::error::{ClientError, ClientResult};
use crate::telemetry::TelemetrySnapshot;

/// Which status payload shape to expect from the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadShape {
    /// Detect per response
    #[default]
    Auto,
    Nested,
    Flat,
}

impl FromStr for PayloadShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(PayloadShape::Auto),
            "nested" => Ok(PayloadShape::Nested),
            "flat" | "legacy" => Ok(PayloadShape::Flat),
            other => Err(format!(
                "unknown payload shape '{}' (expected auto, nested or flat)",
                other
            )),
        }
    }
}

impl fmt::Display for PayloadShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PayloadShape::Auto => "auto",
            PayloadShape::Nested => "nested",
            PayloadShape::Flat => "flat",
        };
        f.write_str(name)
    }
}

// ============================================
// Nested (canonical) status shape
// ============================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusPayload {
    pub status: Option<String>,
    pub posture: Option<PosturePayload>,
    pub typing: Option<TypingPayload>,
    pub breaks: Option<BreaksPayload>,
    pub stress: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PosturePayload {
    pub score: Option<f64>,
    pub status: Option<String>,
    /// Display hint, ignored by the client
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypingPayload {
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BreaksPayload {
    pub taken: Option<u32>,
    pub should_break: Option<bool>,
    pub time: Option<String>,
}

impl From<StatusPayload> for TelemetrySnapshot {
    fn from(payload: StatusPayload) -> Self {
        let (posture_score, posture_status_text) = match payload.posture {
            Some(posture) => (posture.score, posture.status),
            None => (None, None),
        };
        let (breaks_taken, should_break, coding_time) = match payload.breaks {
            Some(breaks) => (breaks.taken, breaks.should_break, breaks.time),
            None => (None, None, None),
        };

        TelemetrySnapshot {
            posture_score,
            posture_status_text,
            coding_time,
            stress_level: payload.stress,
            breaks_taken,
            typing_speed: payload.typing.and_then(|t| t.speed),
            should_break,
            service_status: payload.status,
        }
    }
}

// ============================================
// Flat (legacy) status shape
// ============================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyStatusPayload {
    pub posture: Option<f64>,
    pub time: Option<String>,
    pub stress: Option<String>,
    pub breaks_taken: Option<u32>,
    pub typing_speed: Option<f64>,
    pub should_break: Option<bool>,
    pub status: Option<String>,
}

impl LegacyStatusPayload {
    /// Adapt to the canonical nested shape
    ///
    /// The flat shape has no posture label, so the band message always comes
    /// from the client.
    pub fn into_nested(self) -> StatusPayload {
        let has_breaks =
            self.breaks_taken.is_some() || self.should_break.is_some() || self.time.is_some();
        let breaks = if has_breaks {
            Some(BreaksPayload {
                taken: self.breaks_taken,
                should_break: self.should_break,
                time: self.time,
            })
        } else {
            None
        };

        StatusPayload {
            status: self.status,
            posture: self.posture.map(|score| PosturePayload {
                score: Some(score),
                status: None,
                color: None,
            }),
            typing: self.typing_speed.map(|speed| TypingPayload { speed: Some(speed) }),
            breaks,
            stress: self.stress,
        }
    }
}

/// Guess the payload shape of a status body
///
/// An object carrying none of the distinguishing fields is treated as the
/// nested shape with every field absent.
pub fn detect_shape(value: &Value) -> PayloadShape {
    let Some(obj) = value.as_object() else {
        return PayloadShape::Nested;
    };

    let nested = obj.get("posture").is_some_and(Value::is_object)
        || obj.get("typing").is_some_and(Value::is_object)
        || obj.get("breaks").is_some_and(Value::is_object);
    if nested {
        return PayloadShape::Nested;
    }

    let flat = obj.get("posture").is_some_and(Value::is_number)
        || ["time", "breaks_taken", "typing_speed"]
            .iter()
            .any(|key| obj.contains_key(*key));
    if flat {
        PayloadShape::Flat
    } else {
        PayloadShape::Nested
    }
}

/// Parse a status body into the canonical shape
pub fn decode_status(body: &[u8], shape: PayloadShape) -> ClientResult<StatusPayload> {
    let value: Value = serde_json::from_slice(body)?;
    if !value.is_object() {
        return Err(ClientError::Parse(
            "status body is not a JSON object".to_string(),
        ));
    }

    let shape = match shape {
        PayloadShape::Auto => detect_shape(&value),
        explicit => explicit,
    };

    match shape {
        PayloadShape::Flat => {
            let legacy: LegacyStatusPayload = serde_json::from_value(value)?;
            Ok(legacy.into_nested())
        }
        PayloadShape::Nested | PayloadShape::Auto => Ok(serde_json::from_value(value)?),
    }
}

// ============================================
// Health
// ============================================

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub components: BTreeMap<String, bool>,
}

/// Backend health with per-component availability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub status: String,
    pub components: BTreeMap<String, bool>,
}

impl HealthReport {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }

    /// Names of components the backend reports as unavailable
    pub fn missing_components(&self) -> Vec<&str> {
        self.components
            .iter()
            .filter(|(_, available)| !**available)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

impl From<HealthResponse> for HealthReport {
    fn from(response: HealthResponse) -> Self {
        Self {
            status: response.status,
            components: response.components,
        }
    }
}
