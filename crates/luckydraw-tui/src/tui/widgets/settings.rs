// Settings panel widget: the three draw fields.
//
// "Min number: 1", "Max number: 1000", "Draw count: 6". When the panel has
// focus the selected field is highlighted; while editing, the typed text is
// shown with a cursor in place of the stored value.

use luckydraw_core::config::ConfigField;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let settings = &state.settings;
    let config = &state.snapshot.config;

    let mut lines: Vec<Line> = ConfigField::ALL
        .iter()
        .map(|&field| {
            let selected = settings.open && settings.field == field;
            let value = if selected && settings.editing {
                format!("{}_", settings.buffer)
            } else {
                config.get(field).to_string()
            };
            field_line(field, value, selected, selected && settings.editing)
        })
        .collect();

    let hint = if settings.open { "" } else { " s to edit" };
    lines.push(Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))));

    let border = if settings.open {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title("Settings"),
    );
    frame.render_widget(paragraph, area);
}

fn field_line(field: ConfigField, value: String, selected: bool, editing: bool) -> Line<'static> {
    let marker = if selected { ">" } else { " " };
    let value_style = if editing {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    } else if selected {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    Line::from(vec![
        Span::raw(format!("{} {}: ", marker, field.label())),
        Span::styled(value, value_style),
    ])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
