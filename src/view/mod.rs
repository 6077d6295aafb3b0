//! Dashboard View
//!
//! - **band**: posture score → discrete band
//! - **renderer**: snapshot + connection flag → `DashboardView`
//! - **panel**: `DashboardView` → terminal text

mod band;
mod panel;
mod renderer;

pub use band::{
    PostureBand, CALIBRATING_MESSAGE, EXCELLENT_MESSAGE, EXCELLENT_THRESHOLD, GOOD_MESSAGE,
    GOOD_THRESHOLD, POOR_MESSAGE,
};
pub use panel::{draw, draw_fullscreen};
pub use renderer::{
    format_number, DashboardView, BAR_BASE_CLASS, CONNECTED_LABEL, DEFAULT_CODING_TIME,
    DEFAULT_STRESS_LEVEL, DISCONNECTED_LABEL, INDICATOR_BASE_CLASS,
};
