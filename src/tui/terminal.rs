//! Crossterm-backed terminal: setup, teardown, and the [`Presenter`] used at runtime.

use super::Presenter;
use crate::error::PresentationInitError;
use crate::model::DisplayModel;
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, SetTitle};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Restores the terminal before the default panic output is printed.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        if let Err(e) = terminal::disable_raw_mode() {
            eprintln!("Failed to disable raw mode during panic: {e}");
        }
        if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen, SetTitle("")) {
            eprintln!("Failed to leave alternate screen during panic: {e}");
        }
        original_hook(panic_info);
    }));
}

/// Enters raw mode and the alternate screen. On failure both are undone
/// before returning, so the caller can print to a normal terminal.
pub fn init(title: &str) -> Result<Tui, PresentationInitError> {
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, SetTitle(title)) {
        let _ = terminal::disable_raw_mode();
        return Err(e.into());
    }
    let setup = Terminal::new(CrosstermBackend::new(stdout)).and_then(|mut tui| {
        tui.clear()?;
        Ok(tui)
    });
    Ok(undo_on_err(setup, abandon_setup)?)
}

fn abandon_setup() {
    let _ = terminal::disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, SetTitle(""));
}

/// Runs `undo` when `result` is an error, then passes the result through.
fn undo_on_err<T>(result: io::Result<T>, undo: impl FnOnce()) -> io::Result<T> {
    if result.is_err() {
        undo();
    }
    result
}

pub fn restore(tui: &mut Tui) -> io::Result<()> {
    terminal::disable_raw_mode()?;
    execute!(tui.backend_mut(), LeaveAlternateScreen, SetTitle(""))?;
    tui.show_cursor()
}

pub struct TerminalPresenter {
    tui: Tui,
}

impl TerminalPresenter {
    pub fn new(tui: Tui) -> Self {
        Self { tui }
    }

    pub fn restore(&mut self) -> io::Result<()> {
        restore(&mut self.tui)
    }
}

impl Presenter for TerminalPresenter {
    fn render(&mut self, model: &DisplayModel) -> io::Result<()> {
        self.tui.draw(|f| super::render(f, model)).map(|_| ())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.tui.clear()
    }
}
