//! Session table — one row per connected client, each carrying its
//! disconnect target.
//!
//! Row projection is a pure function so the row/affordance contract is
//! testable without a terminal: an empty snapshot yields exactly one
//! placeholder row with no disconnect target, a non-empty one yields one
//! row and one target per session.

use std::sync::Arc;

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use gatewatch_core::{Session, SessionId};

use crate::theme;
use crate::widgets::bytes_fmt;

const COLUMNS: [&str; 6] = ["User", "Address", "MAC", "Uptime", "↓ Down", "↑ Up"];

/// One displayable row: the cells plus the disconnect target it carries
/// (`None` for the placeholder row).
pub struct SessionRow {
    pub target: Option<(SessionId, String)>,
    pub cells: Vec<String>,
}

/// Project a session snapshot into displayable rows.
///
/// Byte counters render as fixed two-decimal megabytes -- uniform units
/// for tabular scanning, unlike the adaptive stat tiles.
pub fn session_rows(sessions: &[Arc<Session>]) -> Vec<SessionRow> {
    if sessions.is_empty() {
        return vec![SessionRow {
            target: None,
            cells: vec!["No clients connected".into()],
        }];
    }

    sessions
        .iter()
        .map(|s| SessionRow {
            target: Some((s.id.clone(), s.display_label().to_owned())),
            cells: vec![
                s.user.clone(),
                s.address.clone(),
                s.mac_address.clone(),
                s.uptime.clone(),
                bytes_fmt::fmt_mb(s.bytes_in),
                bytes_fmt::fmt_mb(s.bytes_out),
            ],
        })
        .collect()
}

/// Stateful session table panel.
pub struct SessionTable {
    sessions: Arc<Vec<Arc<Session>>>,
    table_state: TableState,
}

impl SessionTable {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(Vec::new()),
            table_state: TableState::default(),
        }
    }

    /// Swap in a fresh snapshot, keeping the selection clamped to the new
    /// row count.
    pub fn set_sessions(&mut self, sessions: Arc<Vec<Arc<Session>>>) {
        self.sessions = sessions;
        let len = self.sessions.len();
        if len == 0 {
            self.table_state.select(None);
        } else {
            let idx = self.table_state.selected().unwrap_or(0).min(len - 1);
            self.table_state.select(Some(idx));
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// The disconnect target of the selected row, if any.
    pub fn selected_target(&self) -> Option<(SessionId, String)> {
        let idx = self.table_state.selected()?;
        let session = self.sessions.get(idx)?;
        Some((session.id.clone(), session.display_label().to_owned()))
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss, clippy::as_conversions)]
    pub fn move_selection(&mut self, delta: isize) {
        let len = self.sessions.len();
        if len == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        self.table_state.select(Some(next as usize));
    }

    pub fn select_first(&mut self) {
        if !self.sessions.is_empty() {
            self.table_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let len = self.sessions.len();
        if len > 0 {
            self.table_state.select(Some(len - 1));
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title = format!(" Active Sessions ({}) ", self.sessions.len());
        let block = Block::default()
            .title(title)
            .title_style(theme::panel_title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::focus_border());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        // Placeholder state renders as a centered message, not a table.
        if self.sessions.is_empty() {
            let placeholder = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No clients connected",
                    Style::default().fg(theme::DIM_TEXT),
                )),
            ])
            .centered();
            frame.render_widget(placeholder, inner);
            return;
        }

        let rows = session_rows(&self.sessions);

        let header = Row::new(
            COLUMNS
                .iter()
                .map(|c| Cell::from(*c).style(theme::column_header())),
        );

        let body: Vec<Row> = rows
            .into_iter()
            .map(|row| {
                let cells: Vec<Cell> = row
                    .cells
                    .into_iter()
                    .enumerate()
                    .map(|(i, text)| {
                        let style = match i {
                            4 => Style::default().fg(theme::DOWNLOAD_GREEN),
                            5 => Style::default().fg(theme::UPLOAD_RED),
                            _ => theme::row_text(),
                        };
                        Cell::from(text).style(style)
                    })
                    .collect();
                Row::new(cells)
            })
            .collect();

        let widths = [
            Constraint::Fill(2),    // user
            Constraint::Length(15), // address
            Constraint::Length(17), // mac
            Constraint::Length(12), // uptime
            Constraint::Length(11), // down
            Constraint::Length(11), // up
        ];

        let table = Table::new(body, widths)
            .header(header)
            .row_highlight_style(theme::row_selected())
            .highlight_symbol("▸ ");

        frame.render_stateful_widget(table, inner, &mut self.table_state);
    }
}

impl Default for SessionTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn session(id: &str, user: &str, bytes_in: u64, bytes_out: u64) -> Arc<Session> {
        Arc::new(Session {
            id: SessionId::from(id),
            user: user.into(),
            address: "10.5.50.20".into(),
            mac_address: "AA:BB:CC:DD:EE:FF".into(),
            uptime: "2h13m40s".into(),
            bytes_in,
            bytes_out,
        })
    }

    #[test]
    fn empty_snapshot_yields_one_placeholder_row_without_a_target() {
        let rows = session_rows(&[]);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].target.is_none());
        assert_eq!(rows[0].cells[0], "No clients connected");
    }

    #[test]
    fn each_session_gets_one_row_tagged_with_its_id_and_label() {
        let sessions = vec![
            session("*1A", "5551230001", 1_048_576, 524_288),
            session("*1B", "5551230002", 1_048_576, 524_288),
        ];
        let rows = session_rows(&sessions);

        assert_eq!(rows.len(), 2);
        let (id, label) = rows[0].target.clone().unwrap();
        assert_eq!(id, SessionId::from("*1A"));
        assert_eq!(label, "5551230001");
        let (id, label) = rows[1].target.clone().unwrap();
        assert_eq!(id, SessionId::from("*1B"));
        assert_eq!(label, "5551230002");
    }

    #[test]
    fn counters_render_as_fixed_two_decimal_megabytes() {
        let sessions = vec![session("*1A", "5551230001", 1_048_576, 524_288)];
        let rows = session_rows(&sessions);
        assert_eq!(rows[0].cells[4], "1.00 MB");
        assert_eq!(rows[0].cells[5], "0.50 MB");
    }

    #[test]
    fn uptime_is_passed_through_verbatim() {
        let sessions = vec![session("*1A", "x", 0, 0)];
        assert_eq!(session_rows(&sessions)[0].cells[3], "2h13m40s");
    }

    #[test]
    fn selection_clamps_when_the_snapshot_shrinks() {
        let mut table = SessionTable::new();
        table.set_sessions(Arc::new(vec![
            session("*1", "a", 0, 0),
            session("*2", "b", 0, 0),
            session("*3", "c", 0, 0),
        ]));
        table.select_last();
        assert_eq!(table.selected_target().unwrap().0, SessionId::from("*3"));

        table.set_sessions(Arc::new(vec![session("*1", "a", 0, 0)]));
        assert_eq!(table.selected_target().unwrap().0, SessionId::from("*1"));

        table.set_sessions(Arc::new(Vec::new()));
        assert!(table.selected_target().is_none());
    }

    #[test]
    fn selection_moves_and_clamps_at_the_edges() {
        let mut table = SessionTable::new();
        table.set_sessions(Arc::new(vec![
            session("*1", "a", 0, 0),
            session("*2", "b", 0, 0),
        ]));
        table.move_selection(-1);
        assert_eq!(table.selected_target().unwrap().0, SessionId::from("*1"));
        table.move_selection(1);
        assert_eq!(table.selected_target().unwrap().0, SessionId::from("*2"));
        table.move_selection(5);
        assert_eq!(table.selected_target().unwrap().0, SessionId::from("*2"));
    }
}
