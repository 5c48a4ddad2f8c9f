//! Streams controller state into the dashboard's action channel.
//!
//! Runs as one background task: connects, then subscribes to the session
//! store, derived stats, busy flag, notices, and connection state, and
//! forwards every change as an [`Action`]. Ends by disconnecting the
//! controller, so cancelling this task is the app's whole teardown.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use gatewatch_core::{ConnectionState, Controller, Notice};

use crate::action::Action;

pub async fn run(
    controller: Controller,
    tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    if let Err(e) = controller.connect().await {
        // The dashboard stays up over a dead gateway; the operator sees
        // the error and can retry with `r` once it comes back.
        warn!(error = %e, "gateway connection failed");
        let _ = tx.send(Action::Disconnected(e.to_string()));
        let _ = tx.send(Action::Notify(Notice::error(e.to_string())));
        return;
    }
    let _ = tx.send(Action::Connected);

    let store = controller.store();
    let mut sessions = store.subscribe_sessions();
    let mut stats = store.subscribe_stats();
    let mut busy = controller.busy();
    let mut link = controller.connection_state();
    let mut notices = controller.notices();

    // Seed the panels with what connect() already loaded.
    let _ = tx.send(Action::SessionsUpdated(sessions.borrow_and_update().clone()));
    let _ = tx.send(Action::StatsUpdated(*stats.borrow_and_update()));

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Ok(()) = sessions.changed() => {
                let _ = tx.send(Action::SessionsUpdated(sessions.borrow_and_update().clone()));
            }
            Ok(()) = stats.changed() => {
                let _ = tx.send(Action::StatsUpdated(*stats.borrow_and_update()));
            }
            Ok(()) = busy.changed() => {
                let _ = tx.send(Action::BusyChanged(*busy.borrow_and_update()));
            }
            Ok(notice) = notices.recv() => {
                let _ = tx.send(Action::Notify(notice));
            }
            Ok(()) = link.changed() => {
                let state = link.borrow_and_update().clone();
                if let Some(action) = link_action(&state) {
                    let _ = tx.send(action);
                }
            }
        }
    }

    controller.disconnect().await;
    debug!("data bridge stopped");
}

fn link_action(state: &ConnectionState) -> Option<Action> {
    match state {
        ConnectionState::Connected => Some(Action::Connected),
        ConnectionState::Disconnected => Some(Action::Disconnected("disconnected".into())),
        ConnectionState::Failed => Some(Action::Disconnected("connection failed".into())),
        ConnectionState::Connecting => None,
    }
}
