//! Output rendering for command results.
//!
//! `table` goes through `tabled`; `json`/`yaml` serialize the domain
//! value itself so scripted consumers get full field names; `plain`
//! emits one identifier per line for shell pipelines.

use std::io::{self, IsTerminal, Write};

use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};

/// Renders command results in the operator's chosen format.
pub struct Printer {
    format: OutputFormat,
    quiet: bool,
}

impl Printer {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    /// Print a list of items, one table row (or identifier) each.
    pub fn list<T, R>(&self, items: &[T], to_row: impl Fn(&T) -> R, id_of: impl Fn(&T) -> String)
    where
        T: Serialize,
        R: Tabled,
    {
        let rendered = match self.format {
            OutputFormat::Table => {
                let rows: Vec<R> = items.iter().map(to_row).collect();
                Table::new(rows).with(Style::rounded()).to_string()
            }
            OutputFormat::Json => to_json(items, false),
            OutputFormat::JsonCompact => to_json(items, true),
            OutputFormat::Yaml => to_yaml(items),
            OutputFormat::Plain => items.iter().map(id_of).collect::<Vec<_>>().join("\n"),
        };
        self.emit(&rendered);
    }

    /// Print a single value; `detail` supplies the human-readable form,
    /// since one-off detail views don't derive `Tabled`.
    pub fn single<T: Serialize>(
        &self,
        value: &T,
        detail: impl Fn(&T) -> String,
        id_of: impl Fn(&T) -> String,
    ) {
        let rendered = match self.format {
            OutputFormat::Table => detail(value),
            OutputFormat::Json => to_json(value, false),
            OutputFormat::JsonCompact => to_json(value, true),
            OutputFormat::Yaml => to_yaml(value),
            OutputFormat::Plain => id_of(value),
        };
        self.emit(&rendered);
    }

    /// Print a pre-rendered string as-is.
    pub fn text(&self, rendered: &str) {
        self.emit(rendered);
    }

    fn emit(&self, rendered: &str) {
        if self.quiet || rendered.is_empty() {
            return;
        }
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "{rendered}");
    }
}

/// Whether status lines on stderr should use color.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, compact: bool) -> String {
    let result = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    result.expect("serialization should not fail")
}

fn to_yaml<T: Serialize + ?Sized>(value: &T) -> String {
    serde_yaml::to_string(value).expect("serialization should not fail")
}
