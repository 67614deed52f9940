//! Color palette and semantic styling for the dashboard.

use ratatui::style::{Color, Modifier, Style};

use hostpulse_core::HostStatus;

// ── Core Palette ──────────────────────────────────────────────────────

pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const ELECTRIC_PURPLE: Color = Color::Rgb(225, 53, 255); // #e135ff
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const WARNING_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36
pub const BG_DARK: Color = Color::Rgb(30, 31, 41); // #1e1f29

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

/// Border for a focused panel.
pub fn border_focused() -> Style {
    Style::default().fg(ELECTRIC_PURPLE)
}

/// Border for an unfocused panel.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Active tab in a tab strip.
pub fn tab_active() -> Style {
    Style::default()
        .fg(ELECTRIC_PURPLE)
        .add_modifier(Modifier::BOLD)
}

/// Inactive tab in a tab strip.
pub fn tab_inactive() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Tab currently held by a drag gesture.
pub fn tab_dragged() -> Style {
    Style::default()
        .fg(WARNING_YELLOW)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

/// Color for a host's reachability classification.
pub fn status_color(status: Option<HostStatus>) -> Color {
    match status {
        Some(HostStatus::Up) => SUCCESS_GREEN,
        Some(HostStatus::Unstable) => WARNING_YELLOW,
        Some(HostStatus::Down) => ERROR_RED,
        // No samples yet
        None => BORDER_GRAY,
    }
}

/// Glyph for a host's reachability classification.
pub fn status_glyph(status: Option<HostStatus>) -> &'static str {
    match status {
        Some(HostStatus::Up) => "●",
        Some(HostStatus::Unstable) => "◐",
        Some(HostStatus::Down) => "○",
        None => "·",
    }
}
