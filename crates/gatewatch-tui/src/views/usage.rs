//! Usage chart — a two-bar comparison of total download vs upload.
//!
//! Not a time series: the chart shows the single latest aggregate
//! snapshot. One instance lives for the whole application lifetime;
//! [`UsageChart::project`] replaces the two values in place and the next
//! frame redraws them.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, BorderType, Borders};

use crate::theme;
use crate::widgets::bytes_fmt;

/// Holds the two projected totals between frames.
pub struct UsageChart {
    total_in: u64,
    total_out: u64,
}

impl UsageChart {
    /// Create the single chart instance. Call once at startup.
    pub fn new() -> Self {
        Self {
            total_in: 0,
            total_out: 0,
        }
    }

    /// Replace the chart's two data values with fresh aggregates.
    pub fn project(&mut self, total_in: u64, total_out: u64) {
        self.total_in = total_in;
        self.total_out = total_out;
    }

    /// The currently projected `(download, upload)` totals.
    pub fn values(&self) -> (u64, u64) {
        (self.total_in, self.total_out)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Network Usage ")
            .title_style(theme::panel_title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::quiet_border());

        // Printed values share the byte-magnitude conventions of the stat
        // tiles, so the two surfaces always agree.
        let bars = [
            Bar::default()
                .label(Line::from("Download"))
                .value(self.total_in)
                .text_value(bytes_fmt::format_bytes(self.total_in, 2))
                .style(Style::default().fg(theme::DOWNLOAD_GREEN))
                .value_style(Style::default().fg(theme::BG_PANEL).bg(theme::DOWNLOAD_GREEN)),
            Bar::default()
                .label(Line::from("Upload"))
                .value(self.total_out)
                .text_value(bytes_fmt::format_bytes(self.total_out, 2))
                .style(Style::default().fg(theme::UPLOAD_RED))
                .value_style(Style::default().fg(theme::BG_PANEL).bg(theme::UPLOAD_RED)),
        ];

        let chart = BarChart::default()
            .block(block)
            .direction(ratatui::layout::Direction::Horizontal)
            .bar_width(1)
            .bar_gap(1)
            .label_style(Style::default().fg(theme::DIM_TEXT))
            .data(BarGroup::default().bars(&bars));

        frame.render_widget(chart, area);
    }
}

impl Default for UsageChart {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        let chart = UsageChart::new();
        assert_eq!(chart.values(), (0, 0));
    }

    #[test]
    fn projected_values_track_the_aggregate_totals() {
        use std::sync::Arc;

        use gatewatch_core::{Session, SessionId, aggregate};

        let session = |id: &str| {
            Arc::new(Session {
                id: SessionId::from(id),
                user: format!("555{id}"),
                address: "10.5.50.20".into(),
                mac_address: "AA:BB:CC:DD:EE:FF".into(),
                uptime: "1h".into(),
                bytes_in: 1_048_576,
                bytes_out: 524_288,
            })
        };
        let stats = aggregate(&[session("1"), session("2")]);

        let mut chart = UsageChart::new();
        chart.project(stats.total_bytes_in, stats.total_bytes_out);

        // The bars carry the doubled totals and print in the same
        // magnitudes as the stat tiles.
        assert_eq!(chart.values(), (2_097_152, 1_048_576));
        assert_eq!(bytes_fmt::format_bytes(chart.values().0, 2), "2 MB");
        assert_eq!(bytes_fmt::format_bytes(chart.values().1, 2), "1 MB");
    }

    #[test]
    fn project_replaces_both_values_in_place() {
        // Create-once-then-update: the same instance carries each new
        // snapshot; nothing accumulates.
        let mut chart = UsageChart::new();
        chart.project(2_097_152, 1_048_576);
        assert_eq!(chart.values(), (2_097_152, 1_048_576));

        chart.project(100, 50);
        assert_eq!(chart.values(), (100, 50));
    }
}
