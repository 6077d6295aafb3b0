//! Terminal panel
//!
//! Draws a `DashboardView` as plain text.

use std::fmt::Write;

use super::renderer::DashboardView;

const BAR_CELLS: usize = 20;
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Draw the panel, with active notifications listed underneath
pub fn draw(view: &DashboardView, notifications: &[String]) -> String {
    let mut out = String::new();

    let indicator = match view.connected {
        Some(true) => "●",
        Some(false) => "○",
        None => "·",
    };
    let _ = write!(out, "DevCare  {} {}", indicator, view.connection_status);
    if let Some(status) = &view.service_status {
        let _ = write!(out, "  ({})", status);
    }
    out.push('\n');
    out.push_str(&"─".repeat(48));
    out.push('\n');

    let _ = writeln!(
        out,
        "Posture       {:<8} {} {}",
        view.posture_score,
        bar(view.posture_bar_width),
        view.posture_band
    );
    let _ = writeln!(out, "              {}", view.posture_status);
    out.push('\n');
    let _ = writeln!(
        out,
        "Coding time   {:<14} Stress   {}",
        view.coding_time, view.stress_level
    );
    let _ = writeln!(
        out,
        "Breaks taken  {:<14} Typing   {}",
        view.breaks_taken, view.typing_speed
    );

    if view.break_suggested {
        out.push('\n');
        out.push_str("☕ Time for a break!\n");
    }

    out.push('\n');
    let _ = writeln!(
        out,
        "Last update: {}",
        view.last_update.as_deref().unwrap_or("never")
    );

    for message in notifications {
        let _ = writeln!(out, "✓ {}", message);
    }

    out
}

/// Same as [`draw`], prefixed with an ANSI clear so the panel redraws in place
pub fn draw_fullscreen(view: &DashboardView, notifications: &[String]) -> String {
    let mut out = String::from(CLEAR_SCREEN);
    out.push_str(&draw(view, notifications));
    out.push_str("\n[b] take break  [r] reset stats  [q] quit\n");
    out
}

/// 20-cell bar, one filled cell per 5 points
fn bar(width_percent: f64) -> String {
    let filled = ((width_percent / 5.0).floor() as usize).min(BAR_CELLS);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(BAR_CELLS - filled))
}
