//! Terminal session for the dashboard: raw mode and the alternate screen
//! are held for the session's lifetime and released on drop or panic.

use std::io::{Stdout, stdout};

use color_eyre::eyre::Result;
use crossterm::{
    cursor, execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};

pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    /// Take over the terminal. If any step fails, whatever was already
    /// switched is switched back before the error is returned.
    pub fn start() -> Result<Self> {
        let mut session = Self {
            terminal: Terminal::new(CrosstermBackend::new(stdout()))?,
        };
        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, cursor::Hide)?;
        session.terminal.clear()?;
        Ok(session)
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        release_terminal();
    }
}

/// Best effort; safe to call when the terminal was never taken over.
fn release_terminal() {
    let _ = execute!(stdout(), LeaveAlternateScreen, cursor::Show);
    let _ = disable_raw_mode();
}

/// Route panics through the log file and hand the shell back a usable
/// terminal before the report is printed. Call before `TerminalSession::start`.
pub fn install_hooks() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .display_env_section(false)
        .panic_section("gatelog-tui crashed; see the log file for the events leading up to it")
        .into_hooks();
    eyre_hook.install()?;

    let report = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        release_terminal();
        tracing::error!(%info, "dashboard panicked");
        report(info);
    }));
    Ok(())
}
