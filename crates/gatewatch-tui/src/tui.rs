//! Terminal lifecycle: raw-mode entry, restoration, panic hooks.
//!
//! The dashboard draws to the alternate screen, and every exit path
//! (clean quit, error, panic) must land back on a usable shell prompt.
//! Restoration therefore lives in one free function that the normal
//! teardown and the panic hook both call.

use std::io::{Stdout, stdout};

use color_eyre::eyre::Result;
use crossterm::{ExecutableCommand, cursor, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

pub type Term = Terminal<CrosstermBackend<Stdout>>;

/// Enter the alternate screen in raw mode and hand back a cleared
/// terminal ready for the first frame.
pub fn init() -> Result<Term> {
    terminal::enable_raw_mode()?;
    stdout().execute(terminal::EnterAlternateScreen)?;
    stdout().execute(cursor::Hide)?;
    let mut term = Terminal::new(CrosstermBackend::new(stdout()))?;
    term.clear()?;
    Ok(term)
}

/// Put the terminal back the way we found it.
///
/// Safe to call more than once; each step is attempted even when an
/// earlier one fails, so a half-broken terminal still gets as much
/// restoration as possible.
pub fn restore() {
    let _ = stdout().execute(cursor::Show);
    let _ = stdout().execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

/// Wire up color-eyre so panics and error reports restore the terminal
/// before anything is printed.
///
/// Call before [`init`] -- a panic during setup must not leave raw mode
/// stuck on.
pub fn install_hooks() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .display_env_section(false)
        .into_hooks();

    eyre_hook.install()?;

    let panic_hook = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore();
        panic_hook(info);
    }));

    Ok(())
}
