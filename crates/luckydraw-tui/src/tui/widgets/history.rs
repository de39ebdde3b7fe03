// History widget: confirmed rounds, newest first.
//
// Each: "Round {n} [{timestamp}]: {winners}" with " | Absent: {numbers}"
// appended when anyone was absent.

use ratatui::layout::{Margin, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};
use ratatui::Frame;

use luckydraw_core::round::join_numbers;

use crate::protocol::HistoryEntry;
use crate::tui::ViewState;

/// Render the history log into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let history = &state.snapshot.history;

    if history.is_empty() {
        let paragraph = Paragraph::new("  No rounds confirmed yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("History"));
        frame.render_widget(paragraph, area);
        return;
    }

    // Visible row count: subtract 2 for borders
    let visible_rows = (area.height as usize).saturating_sub(2);
    let total = history.len();

    // Clamp scroll offset
    let max_offset = total.saturating_sub(visible_rows);
    let scroll_offset = state.history_scroll.min(max_offset);

    let items: Vec<ListItem> = history
        .iter()
        .rev()
        .skip(scroll_offset)
        .take(visible_rows.max(1))
        .map(|entry| ListItem::new(history_line(entry)))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("History ({})", total)),
    );
    frame.render_widget(list, area);

    // Render vertical scrollbar if content overflows
    if total > visible_rows {
        let mut scrollbar_state =
            ScrollbarState::new(total.saturating_sub(visible_rows)).position(scroll_offset);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

/// Format a confirmed round for display.
pub fn format_round(entry: &HistoryEntry) -> String {
    let mut text = format!(
        "Round {} [{}]: {}",
        entry.index,
        entry.timestamp,
        join_numbers(&entry.numbers)
    );
    if !entry.absent_numbers.is_empty() {
        text.push_str(&format!(" | Absent: {}", join_numbers(&entry.absent_numbers)));
    }
    text
}

fn history_line(entry: &HistoryEntry) -> Line<'static> {
    let color = if entry.absent_numbers.is_empty() {
        Color::White
    } else {
        Color::Yellow
    };
    Line::from(Span::styled(format_round(entry), Style::default().fg(color)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
