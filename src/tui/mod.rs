pub mod footer;
pub mod table;
pub mod terminal;

use crate::model::DisplayModel;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

pub use terminal::TerminalPresenter;

/// Draws display models onto some surface.
pub trait Presenter: Send {
    fn render(&mut self, model: &DisplayModel) -> std::io::Result<()>;

    /// Wipes the surface, used after the terminal changed size.
    fn clear(&mut self) -> std::io::Result<()>;
}

pub fn render(f: &mut Frame, model: &DisplayModel) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // table
            Constraint::Length(1), // footer
        ])
        .split(f.area());

    table::render(f, chunks[0], model);
    footer::render(f, chunks[1], model);
}
