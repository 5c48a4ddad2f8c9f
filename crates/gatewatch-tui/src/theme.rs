//! Palette and semantic styles for the dashboard.
//!
//! Download/upload keep the gateway's traditional traffic colors (green
//! in, red out) so the chart, stat tiles, and table columns all agree.

use ratatui::style::{Color, Modifier, Style};

pub const ACCENT_CYAN: Color = Color::Rgb(102, 217, 239); // #66d9ef
pub const HEADLINE_BLUE: Color = Color::Rgb(129, 162, 250); // #81a2fa
pub const DOWNLOAD_GREEN: Color = Color::Rgb(40, 167, 69); // #28a745
pub const UPLOAD_RED: Color = Color::Rgb(220, 53, 69); // #dc3545
pub const WARNING_AMBER: Color = Color::Rgb(255, 193, 7); // #ffc107
pub const SUCCESS_GREEN: Color = Color::Rgb(92, 214, 112); // #5cd670
pub const ERROR_RED: Color = Color::Rgb(255, 105, 97); // #ff6961

pub const DIM_TEXT: Color = Color::Rgb(166, 172, 185); // #a6acb9
pub const BORDER_GRAY: Color = Color::Rgb(88, 96, 117); // #586075
pub const BG_PANEL: Color = Color::Rgb(24, 26, 33); // #181a21
pub const ROW_HIGHLIGHT: Color = Color::Rgb(44, 48, 62); // #2c303e

/// Panel title text.
pub fn panel_title() -> Style {
    bold(HEADLINE_BLUE)
}

/// Border of the panel holding keyboard focus.
pub fn focus_border() -> Style {
    Style::new().fg(ACCENT_CYAN)
}

/// Border of every other panel.
pub fn quiet_border() -> Style {
    Style::new().fg(BORDER_GRAY)
}

/// Table column headers.
pub fn column_header() -> Style {
    bold(HEADLINE_BLUE).add_modifier(Modifier::UNDERLINED)
}

/// Unselected table row text.
pub fn row_text() -> Style {
    Style::new().fg(DIM_TEXT)
}

/// The selected table row.
pub fn row_selected() -> Style {
    Style::new().bg(ROW_HIGHLIGHT).add_modifier(Modifier::BOLD)
}

/// Muted explanatory text (key hints, data-age line).
pub fn hint() -> Style {
    Style::new().fg(BORDER_GRAY)
}

/// The key character inside a hint ("q" in "q quit").
pub fn hint_key() -> Style {
    bold(ACCENT_CYAN)
}

fn bold(color: Color) -> Style {
    Style::new().fg(color).add_modifier(Modifier::BOLD)
}
