//! Terminal input and cadence events for the dashboard loop.
//!
//! A background task owns the crossterm `EventStream` and multiplexes it
//! with two interval timers: a coarse housekeeping tick (toast expiry,
//! throbber animation) and a render tick that paces frame draws. The
//! dashboard is keyboard-only, so mouse, focus, and paste events never
//! leave this module.

use std::time::Duration;

use crossterm::event::{self, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// What the dashboard loop wakes up for.
#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize(u16, u16),
    /// Housekeeping cadence.
    Tick,
    /// Frame cadence.
    Render,
}

/// Handle to the background reader task.
pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    pub fn new(tick_rate: Duration, render_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        tokio::spawn(read_loop(tx, tick_rate, render_rate, cancel.clone()));
        Self { rx, cancel }
    }

    /// Next event, or `None` once the reader has shut down.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn read_loop(
    tx: mpsc::UnboundedSender<Event>,
    tick_rate: Duration,
    render_rate: Duration,
    cancel: CancellationToken,
) {
    let mut input = EventStream::new();
    let mut tick = tokio::time::interval(tick_rate);
    let mut frame = tokio::time::interval(render_rate);
    // Skip missed ticks instead of bursting to catch up.
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    frame.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => return,
            _ = tick.tick() => Some(Event::Tick),
            _ = frame.tick() => Some(Event::Render),
            Some(Ok(raw)) = input.next() => translate(raw),
        };
        let Some(event) = event else { continue };
        if tx.send(event).is_err() {
            // Receiver gone; the app is shutting down.
            return;
        }
    }
}

/// Keep key presses and resizes; drop everything else at the source.
fn translate(raw: event::Event) -> Option<Event> {
    match raw {
        event::Event::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        event::Event::Resize(cols, rows) => Some(Event::Resize(cols, rows)),
        _ => None,
    }
}
