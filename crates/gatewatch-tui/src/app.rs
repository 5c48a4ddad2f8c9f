//! Application core — event loop, action dispatch, overlay rendering.
//!
//! All mutable UI state (the pending disconnect confirmation, the single
//! chart instance, the active toast) lives on this one object,
//! constructed once at startup. Teardown cancels the data bridge, which
//! stops the poll timer; a request already in flight may still resolve
//! against the store, but no longer reaches a display.

use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use gatewatch_core::{
    AggregateStats, Command, CommandResult, Controller, DisconnectFlow, Notice, NoticeLevel,
    PendingDisconnect,
};

use crate::action::Action;
use crate::event::{Event, EventReader};
use crate::theme;
use crate::tui;
use crate::views::sessions::SessionTable;
use crate::views::usage::UsageChart;
use crate::widgets::bytes_fmt;

/// How long a toast stays on screen before auto-dismissing.
const TOAST_TTL: Duration = Duration::from_secs(3);

/// Gateway link state as seen by the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Link {
    #[default]
    Down,
    Up,
}

/// Top-level application state and event loop.
pub struct App {
    running: bool,
    link: Link,
    help_visible: bool,
    /// True while the controller has a request in flight.
    busy: bool,
    throbber_state: throbber_widgets_tui::ThrobberState,
    /// Action sender — background tasks dispatch through this.
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    controller: Controller,
    /// Cancellation token for the data bridge task.
    data_cancel: CancellationToken,
    /// Confirm-then-commit state for the disconnect action.
    confirm: DisconnectFlow,
    /// Active toast with the instant it appeared.
    toast: Option<(Notice, Instant)>,
    /// When the last session snapshot arrived.
    last_data_update: Option<Instant>,
    stats: AggregateStats,
    sessions: SessionTable,
    /// The single chart instance, updated in place for the app's lifetime.
    usage: UsageChart,
}

impl App {
    pub fn new(controller: Controller) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        Self {
            running: true,
            link: Link::default(),
            help_visible: false,
            busy: false,
            throbber_state: throbber_widgets_tui::ThrobberState::default(),
            action_tx,
            action_rx,
            controller,
            data_cancel: CancellationToken::new(),
            confirm: DisconnectFlow::new(),
            toast: None,
            last_data_update: None,
            stats: AggregateStats::default(),
            sessions: SessionTable::new(),
            usage: UsageChart::new(),
        }
    }

    /// Enter the terminal, run the loop, and restore on every exit path.
    pub async fn run(&mut self) -> Result<()> {
        let mut term = tui::init()?;

        // Data bridge: connect, then stream store changes as actions.
        tokio::spawn(crate::data_bridge::run(
            self.controller.clone(),
            self.action_tx.clone(),
            self.data_cancel.clone(),
        ));

        let mut events = EventReader::new(
            Duration::from_millis(250), // housekeeping at 4 Hz
            Duration::from_millis(33),  // frames at ~30 FPS
        );
        info!("TUI event loop started");

        let outcome = self.event_loop(&mut term, &mut events).await;

        self.data_cancel.cancel();
        events.stop();
        tui::restore();
        info!("TUI event loop ended");
        outcome
    }

    async fn event_loop(&mut self, term: &mut tui::Term, events: &mut EventReader) -> Result<()> {
        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            let action = match event {
                Event::Key(key) => self.handle_key_event(key),
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                Event::Tick => Some(Action::Tick),
                Event::Render => Some(Action::Render),
            };
            if let Some(action) = action {
                self.action_tx.send(action)?;
            }

            // Drain everything queued (input plus data-bridge traffic)
            // before going back to sleep.
            while let Ok(action) = self.action_rx.try_recv() {
                let draw_after = matches!(action, Action::Render);
                self.process_action(&action);
                if draw_after {
                    term.draw(|frame| self.render(frame))?;
                }
            }
        }
        Ok(())
    }

    /// Map a key event to an action. The confirmation dialog captures all
    /// input while visible.
    fn handle_key_event(&mut self, key: KeyEvent) -> Option<Action> {
        if self.confirm.is_pending() {
            return match key.code {
                KeyCode::Char('y' | 'Y') => Some(Action::ConfirmYes),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            };
        }

        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            };
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q')) => Some(Action::Quit),

            (KeyModifiers::NONE, KeyCode::Char('?')) => Some(Action::ToggleHelp),

            (KeyModifiers::NONE, KeyCode::Char('r')) => Some(Action::RequestRefresh),
            (KeyModifiers::NONE, KeyCode::Char('s')) => Some(Action::RequestSheetRefresh),

            (KeyModifiers::NONE, KeyCode::Char('j') | KeyCode::Down) => {
                self.sessions.move_selection(1);
                None
            }
            (KeyModifiers::NONE, KeyCode::Char('k') | KeyCode::Up) => {
                self.sessions.move_selection(-1);
                None
            }
            (KeyModifiers::NONE, KeyCode::Char('g')) => {
                self.sessions.select_first();
                None
            }
            (KeyModifiers::SHIFT, KeyCode::Char('G')) => {
                self.sessions.select_last();
                None
            }

            (KeyModifiers::NONE, KeyCode::Char('d' | 'x')) => self
                .sessions
                .selected_target()
                .map(|(id, label)| Action::RequestDisconnect { id, label }),

            _ => None,
        }
    }

    /// Process a single action — the sole place app state mutates.
    fn process_action(&mut self, action: &Action) {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Render | Action::Resize(..) => {}

            Action::Tick => {
                if self
                    .toast
                    .as_ref()
                    .is_some_and(|(_, shown)| shown.elapsed() > TOAST_TTL)
                {
                    self.toast = None;
                }
                if self.busy {
                    self.throbber_state.calc_next();
                }
            }

            Action::SessionsUpdated(sessions) => {
                self.sessions.set_sessions(sessions.clone());
                self.last_data_update = Some(Instant::now());
            }

            Action::StatsUpdated(stats) => {
                self.stats = *stats;
                // Feed the aggregate totals to the single chart instance.
                self.usage
                    .project(stats.total_bytes_in, stats.total_bytes_out);
            }

            Action::BusyChanged(busy) => {
                self.busy = *busy;
            }

            Action::Connected => {
                self.link = Link::Up;
            }

            Action::Disconnected(_) => {
                self.link = Link::Down;
            }

            Action::RequestRefresh => {
                // Failures surface through the notice channel.
                let controller = self.controller.clone();
                tokio::spawn(async move {
                    let _ = controller.refresh().await;
                });
            }

            Action::RequestSheetRefresh => {
                self.execute_sheet_refresh();
            }

            Action::RequestDisconnect { id, label } => {
                // Selecting while a prompt is already open replaces the
                // target -- last selection wins.
                self.confirm.select(id.clone(), label.clone());
            }

            Action::ConfirmYes => {
                // Read the target current at confirm time, not one captured
                // when the prompt opened.
                if let Some(pending) = self.confirm.confirm() {
                    self.execute_disconnect(pending);
                }
            }

            Action::ConfirmNo => {
                self.confirm.cancel();
            }

            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }

            Action::Notify(notice) => {
                self.toast = Some((notice.clone(), Instant::now()));
            }
        }
    }

    // ── Command execution ─────────────────────────────────────────

    /// Issue the disconnect for a confirmed target. The controller
    /// refreshes the session list on success; this task only reports the
    /// outcome.
    fn execute_disconnect(&self, pending: PendingDisconnect) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let command = Command::DisconnectSession {
                id: pending.target_id,
            };
            let notice = match controller.execute(command).await {
                Ok(CommandResult::Disconnected { label, message }) => Notice::success(
                    message.unwrap_or_else(|| format!("Disconnected {label}")),
                ),
                Ok(_) => return,
                Err(e) => {
                    warn!(error = %e, "disconnect failed");
                    Notice::error(e.to_string())
                }
            };
            let _ = tx.send(Action::Notify(notice));
        });
    }

    fn execute_sheet_refresh(&self) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let notice = match controller.execute(Command::RefreshSheet).await {
                Ok(CommandResult::SheetRefreshed { rows, message }) => {
                    Notice::success(message.unwrap_or_else(|| match rows {
                        Some(n) => format!("Credential mirror refreshed ({n} rows)"),
                        None => "Credential mirror refreshed".into(),
                    }))
                }
                Ok(_) => return,
                Err(e) => {
                    warn!(error = %e, "sheet refresh failed");
                    Notice::error(e.to_string())
                }
            };
            let _ = tx.send(Action::Notify(notice));
        });
    }

    // ── Rendering ─────────────────────────────────────────────────

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        let [tiles, chart, table, status] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(8),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .areas(area);

        self.render_stat_tiles(frame, tiles);
        self.usage.render(frame, chart);
        self.sessions.render(frame, table);
        self.render_status_bar(frame, status);

        // Overlays on top (order matters: last = topmost)
        if let Some((notice, _)) = self.toast.clone() {
            self.render_toast(frame, area, &notice);
        }
        if let Some(pending) = self.confirm.pending().cloned() {
            self.render_confirm_dialog(frame, area, &pending);
        }
        if self.help_visible {
            self.render_help_overlay(frame, area);
        }
    }

    fn render_stat_tiles(&self, frame: &mut Frame, area: Rect) {
        let thirds = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(area);

        let tiles = [
            (
                " Connected Clients ",
                self.stats.connected_count.to_string(),
                theme::ACCENT_CYAN,
            ),
            (
                " Total Download ",
                bytes_fmt::format_bytes(self.stats.total_bytes_in, 2),
                theme::DOWNLOAD_GREEN,
            ),
            (
                " Total Upload ",
                bytes_fmt::format_bytes(self.stats.total_bytes_out, 2),
                theme::UPLOAD_RED,
            ),
        ];

        for ((title, value, color), slot) in tiles.into_iter().zip(thirds.iter()) {
            let tile = Paragraph::new(Span::styled(value, Style::new().fg(color)))
                .block(panel(title).border_style(theme::quiet_border()));
            frame.render_widget(tile, *slot);
        }
    }

    fn render_status_bar(&mut self, frame: &mut Frame, area: Rect) {
        let [line_area, throbber_area] =
            Layout::horizontal([Constraint::Min(10), Constraint::Length(16)]).areas(area);

        let link = match self.link {
            Link::Up => Span::styled("● connected", Style::new().fg(theme::SUCCESS_GREEN)),
            Link::Down => Span::styled("○ disconnected", Style::new().fg(theme::ERROR_RED)),
        };

        let line = Line::from(vec![
            Span::raw(" "),
            link,
            Span::styled(format!(" │ updated {}", self.refresh_age_str()), theme::hint()),
            Span::styled(
                " │ r refresh  s sheet  d disconnect  ? help  q quit",
                theme::hint(),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), line_area);

        if self.busy {
            let throbber = throbber_widgets_tui::Throbber::default()
                .label("refreshing")
                .style(Style::new().fg(theme::WARNING_AMBER));
            frame.render_stateful_widget(throbber, throbber_area, &mut self.throbber_state);
        }
    }

    /// Format the data age for the status bar.
    fn refresh_age_str(&self) -> String {
        let Some(at) = self.last_data_update else {
            return "never".into();
        };
        match at.elapsed().as_secs() {
            s if s < 5 => "just now".into(),
            s if s < 60 => format!("{s}s ago"),
            s => format!("{}m ago", s / 60),
        }
    }

    /// Centered confirmation dialog for the pending disconnect.
    #[allow(clippy::unused_self)]
    fn render_confirm_dialog(&self, frame: &mut Frame, area: Rect, pending: &PendingDisconnect) {
        let dialog = centered(area, 54, 6);
        let block = panel(" Confirm Disconnect ")
            .border_style(Style::new().fg(theme::WARNING_AMBER));
        let inner = clear_under(frame, dialog, &block);

        let text = vec![
            Line::from(Span::styled(
                format!("  Disconnect {}?", pending.target_label),
                Style::new().fg(theme::DIM_TEXT),
            )),
            Line::from(Span::styled(
                "  The client's device will be blocked.",
                theme::hint(),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  y ", theme::hint_key()),
                Span::styled("confirm    ", theme::hint()),
                Span::styled("n ", theme::hint_key()),
                Span::styled("cancel", theme::hint()),
            ]),
        ];
        frame.render_widget(Paragraph::new(text), inner);
    }

    /// Toast in the bottom-right corner, above the status bar.
    #[allow(clippy::unused_self, clippy::cast_possible_truncation, clippy::as_conversions)]
    fn render_toast(&self, frame: &mut Frame, area: Rect, notice: &Notice) {
        let width = (notice.message.len() as u16 + 6).clamp(20, 60);
        let x = area.width.saturating_sub(width + 1);
        let y = area.height.saturating_sub(5);
        let toast_area = Rect::new(area.x + x, area.y + y, width, 3);

        let (color, icon) = match notice.level {
            NoticeLevel::Success => (theme::SUCCESS_GREEN, "✓"),
            NoticeLevel::Error => (theme::ERROR_RED, "✗"),
            NoticeLevel::Warning => (theme::WARNING_AMBER, "!"),
            NoticeLevel::Info => (theme::ACCENT_CYAN, "·"),
        };

        let block = Block::new()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(color));
        let inner = clear_under(frame, toast_area, &block);

        let line = Line::from(vec![
            Span::styled(format!(" {icon} "), Style::new().fg(color)),
            Span::styled(&notice.message, Style::new().fg(theme::DIM_TEXT)),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }

    /// Help overlay centered on screen.
    #[allow(clippy::unused_self)]
    fn render_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let help_area = centered(area, 46, 12);
        let block = panel(" Keyboard Shortcuts ").border_style(theme::focus_border());
        let inner = clear_under(frame, help_area, &block);

        let row = |key: &'static str, desc: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {key:<10}"), theme::hint_key()),
                Span::styled(desc, theme::hint()),
            ])
        };

        let help_text = vec![
            Line::from(""),
            row("j/k ↑/↓", "Move selection"),
            row("g/G", "Top / bottom"),
            row("d", "Disconnect selected client"),
            row("r", "Refresh session list"),
            row("s", "Refresh credential mirror"),
            row("?", "This help"),
            row("q", "Quit"),
            Line::from(""),
            Line::from(Span::styled(
                "              Esc or ? to close",
                theme::hint(),
            )),
        ];

        frame.render_widget(Paragraph::new(help_text), inner);
    }
}

// ── Overlay helpers ───────────────────────────────────────────────

/// Rounded bordered panel with a styled title.
fn panel(title: &'static str) -> Block<'static> {
    Block::new()
        .title(title)
        .title_style(theme::panel_title())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
}

/// A rect of at most `width` x `height` centered in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;
    Rect::new(area.x + x, area.y + y, width, height)
}

/// Paint an opaque backdrop, draw the block, and return its inner area.
fn clear_under(frame: &mut Frame, area: Rect, block: &Block) -> Rect {
    frame.render_widget(Block::new().style(Style::new().bg(theme::BG_PANEL)), area);
    let inner = block.inner(area);
    frame.render_widget(block.clone(), area);
    inner
}
