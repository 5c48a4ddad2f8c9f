//! Configuration helper commands.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output::Printer;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let printer = Printer::new(global.output, global.quiet);
    match args.command {
        ConfigCommand::Path => {
            printer.text(&gatewatch_config::config_path().display().to_string());
            Ok(())
        }
        ConfigCommand::Show => {
            let mut cfg = gatewatch_config::load_config_or_default();
            for profile in cfg.profiles.values_mut() {
                if profile.password.is_some() {
                    profile.password = Some("<redacted>".into());
                }
            }
            let rendered = toml::to_string_pretty(&cfg)
                .map_err(gatewatch_config::ConfigError::Serialization)?;
            printer.text(rendered.trim_end());
            Ok(())
        }
        ConfigCommand::Init {
            ref gateway,
            ref username,
        } => {
            let path = gatewatch_config::config_path();
            if path.exists() {
                return Err(CliError::Config(gatewatch_config::ConfigError::Validation {
                    field: "config".into(),
                    reason: format!("{} already exists", path.display()),
                }));
            }

            let mut cfg = gatewatch_config::Config::default();
            cfg.profiles.insert(
                "default".into(),
                gatewatch_config::Profile {
                    gateway: gateway.clone(),
                    username: username.clone(),
                    ..gatewatch_config::Profile::default()
                },
            );
            gatewatch_config::save_config(&cfg)?;
            printer.text(&format!("Wrote {}", path.display()));
            Ok(())
        }
    }
}
