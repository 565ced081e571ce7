use crate::model::{ColorClass, DisplayModel};
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Row, Table};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

pub fn render(f: &mut Frame, area: Rect, model: &DisplayModel) {
    let header = Row::new(model.header).style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows = model
        .rows
        .iter()
        .map(|row| Row::new(row.cells()).style(Style::default().fg(row_color(row.color))));

    let table = Table::new(rows, column_constraints(model))
        .header(header)
        .column_spacing(2)
        .block(
            Block::bordered()
                .title(format!(" {} ", model.title))
                .border_style(Style::default().fg(Color::DarkGray)),
        );

    f.render_widget(table, area);
}

pub fn row_color(color: ColorClass) -> Color {
    match color {
        ColorClass::Success => Color::Green,
        ColorClass::Failure => Color::Red,
        ColorClass::Neutral => Color::Yellow,
    }
}

/// Sizes every column to its widest cell; the url column takes what is left.
fn column_constraints(model: &DisplayModel) -> Vec<Constraint> {
    let widths = column_widths(model);
    let last = widths.len() - 1;
    widths
        .iter()
        .enumerate()
        .map(|(i, &w)| {
            if i == last {
                Constraint::Min(w)
            } else {
                Constraint::Length(w)
            }
        })
        .collect()
}

pub fn column_widths(model: &DisplayModel) -> [u16; 5] {
    let mut widths = model.header.map(|h| UnicodeWidthStr::width(h) as u16);
    for row in &model.rows {
        for (w, cell) in widths.iter_mut().zip(row.cells()) {
            *w = (*w).max(UnicodeWidthStr::width(cell) as u16);
        }
    }
    widths
}
