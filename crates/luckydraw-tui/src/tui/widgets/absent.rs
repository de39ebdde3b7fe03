// Absent panel widget: numbers marked absent in the current round.
//
// Shows how many of them are still waiting for a redraw.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use luckydraw_core::round::join_numbers;

use crate::protocol::AppSnapshot;

pub fn render(frame: &mut Frame, area: Rect, snapshot: &AppSnapshot) {
    let line = if snapshot.absent.is_empty() {
        Line::from(Span::styled(" None", Style::default().fg(Color::DarkGray)))
    } else {
        Line::from(Span::styled(
            format!(" {}", join_numbers(&snapshot.absent)),
            Style::default().fg(Color::Red),
        ))
    };

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title(snapshot)),
    );
    frame.render_widget(paragraph, area);
}

pub fn title(snapshot: &AppSnapshot) -> String {
    match snapshot.unreplaced_absent {
        0 => format!("Absent ({})", snapshot.absent.len()),
        n => format!("Absent ({}, {} to redraw)", snapshot.absent.len(), n),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
