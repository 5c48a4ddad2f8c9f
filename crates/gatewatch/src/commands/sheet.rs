//! Credential-mirror command handlers.

use owo_colors::OwoColorize;

use gatewatch_core::{Command as CoreCommand, CommandResult, Controller};

use crate::cli::{GlobalOpts, SheetArgs, SheetCommand};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(args: SheetArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let config = util::resolve_gateway_config(global)?;

    match args.command {
        SheetCommand::Refresh => {
            let result = Controller::oneshot(config, |c| async move {
                c.execute(CoreCommand::RefreshSheet).await
            })
            .await?;

            if !global.quiet {
                let text = match result {
                    CommandResult::SheetRefreshed {
                        message: Some(msg), ..
                    } => msg,
                    CommandResult::SheetRefreshed {
                        rows: Some(rows), ..
                    } => format!("Credential mirror refreshed ({rows} rows)"),
                    _ => "Credential mirror refreshed".into(),
                };
                if output::should_color(global.color) {
                    eprintln!("{}", text.green());
                } else {
                    eprintln!("{text}");
                }
            }
            Ok(())
        }
    }
}
