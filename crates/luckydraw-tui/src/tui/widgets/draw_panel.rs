// Draw panel widget: the current draw as a grid of number tiles.
//
// Tiles wrap to the panel width. The selected tile is highlighted while
// reviewing, and the grid scrolls so the selected row stays visible.

use luckydraw_core::Phase;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let snapshot = &state.snapshot;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Round {} ({} drawn)", snapshot.round, snapshot.current.len()));

    if snapshot.phase == Phase::Drawing {
        let paragraph = Paragraph::new(vec![
            Line::default(),
            Line::from(Span::styled(
                "Drawing...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    if snapshot.current.is_empty() {
        let paragraph = Paragraph::new("  Press d to draw.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    // Visible rows/columns inside the borders
    let inner_width = area.width.saturating_sub(2) as usize;
    let visible_rows = (area.height as usize).saturating_sub(2).max(1);

    let selected = (snapshot.phase == Phase::Reviewing).then_some(state.selected_tile);
    let rows = tile_rows(&snapshot.current, inner_width, selected);

    // Keep the row holding the selected tile on screen
    let per_row = tiles_per_row(&snapshot.current, inner_width);
    let selected_row = state.selected_tile / per_row;
    let first_row = selected_row.saturating_sub(visible_rows - 1);

    let lines: Vec<Line> = rows.into_iter().skip(first_row).take(visible_rows).collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Width of one tile: the widest number plus one column of padding each side.
fn tile_width(numbers: &[i64]) -> usize {
    numbers
        .iter()
        .map(|n| n.to_string().len())
        .max()
        .unwrap_or(1)
        + 2
}

/// How many tiles fit on one line, with a single space between tiles.
pub fn tiles_per_row(numbers: &[i64], width: usize) -> usize {
    ((width + 1) / (tile_width(numbers) + 1)).max(1)
}

/// Lay the numbers out as lines of styled tiles.
pub fn tile_rows(numbers: &[i64], width: usize, selected: Option<usize>) -> Vec<Line<'static>> {
    let tile_w = tile_width(numbers) - 2;
    let per_row = tiles_per_row(numbers, width);

    numbers
        .chunks(per_row)
        .enumerate()
        .map(|(row, chunk)| {
            let mut spans = Vec::with_capacity(chunk.len() * 2);
            for (col, n) in chunk.iter().enumerate() {
                if col > 0 {
                    spans.push(Span::raw(" "));
                }
                let index = row * per_row + col;
                spans.push(Span::styled(
                    format!(" {:>w$} ", n, w = tile_w),
                    tile_style(selected == Some(index)),
                ));
            }
            Line::from(spans)
        })
        .collect()
}

fn tile_style(selected: bool) -> Style {
    let bg = if selected { Color::Yellow } else { Color::Green };
    Style::default()
        .fg(Color::Black)
        .bg(bg)
        .add_modifier(Modifier::BOLD)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
