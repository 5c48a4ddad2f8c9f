//! Session command handlers.

use std::sync::Arc;

use owo_colors::OwoColorize;
use tabled::Tabled;

use gatewatch_core::{
    AggregateStats, Command as CoreCommand, CommandResult, Controller, Session, aggregate,
};

use crate::cli::{GlobalOpts, SessionsArgs, SessionsCommand};
use crate::error::CliError;
use crate::output::{self, Printer};

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SessionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Uptime")]
    uptime: String,
    #[tabled(rename = "Down (MB)")]
    down: String,
    #[tabled(rename = "Up (MB)")]
    up: String,
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn mb(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / 1024.0 / 1024.0)
}

impl From<&Arc<Session>> for SessionRow {
    fn from(s: &Arc<Session>) -> Self {
        Self {
            id: s.id.to_string(),
            user: s.user.clone(),
            address: s.address.clone(),
            mac: s.mac_address.clone(),
            uptime: s.uptime.clone(),
            down: mb(s.bytes_in),
            up: mb(s.bytes_out),
        }
    }
}

fn stats_detail(stats: &AggregateStats) -> String {
    [
        format!("Connected: {}", stats.connected_count),
        format!("Download:  {} bytes", stats.total_bytes_in),
        format!("Upload:    {} bytes", stats.total_bytes_out),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: SessionsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let config = util::resolve_gateway_config(global)?;
    let printer = Printer::new(global.output, global.quiet);

    match args.command {
        SessionsCommand::List => {
            let snap = Controller::oneshot(config, |c| async move {
                Ok(c.store().sessions_snapshot())
            })
            .await?;
            printer.list(&snap, |s| SessionRow::from(s), |s| s.id.to_string());
            Ok(())
        }

        SessionsCommand::Stats => {
            let snap = Controller::oneshot(config, |c| async move {
                Ok(c.store().sessions_snapshot())
            })
            .await?;
            let stats = aggregate(&snap);
            printer.single(&stats, stats_detail, |s| s.connected_count.to_string());
            Ok(())
        }

        SessionsCommand::Disconnect { session, yes } => {
            disconnect(config, &session, yes, global).await
        }
    }
}

async fn disconnect(
    config: gatewatch_core::GatewayConfig,
    session: &str,
    yes: bool,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let controller = Controller::new(config)?;
    controller.connect().await?;

    let result = disconnect_inner(&controller, session, yes, global).await;
    controller.disconnect().await;
    result
}

async fn disconnect_inner(
    controller: &Controller,
    session: &str,
    yes: bool,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let snap = controller.store().sessions_snapshot();
    let target = snap
        .iter()
        .find(|s| s.id.as_str() == session || s.user == session)
        .ok_or_else(|| CliError::NotFound {
            resource_type: "session".into(),
            identifier: session.into(),
            list_command: "sessions list".into(),
        })?;

    let label = target.display_label().to_owned();

    if !yes {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(format!(
                "Disconnect {label}? The client's device will be blocked"
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            if !global.quiet {
                eprintln!("Cancelled");
            }
            return Ok(());
        }
    }

    let result = controller
        .execute(CoreCommand::DisconnectSession {
            id: target.id.clone(),
        })
        .await?;

    if !global.quiet {
        let text = match result {
            CommandResult::Disconnected {
                message: Some(msg), ..
            } => msg,
            _ => format!("Disconnected {label}"),
        };
        if output::should_color(global.color) {
            eprintln!("{}", text.green());
        } else {
            eprintln!("{text}");
        }
    }
    Ok(())
}
