// Stats panel widget: winners so far, numbers left in range, rounds completed.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::protocol::AppSnapshot;

pub fn render(frame: &mut Frame, area: Rect, snapshot: &AppSnapshot) {
    let remaining_color = remaining_color(snapshot.remaining_count, snapshot.config.draw_count);

    let lines = vec![
        stat_line("Winners", snapshot.winning_count.to_string(), Color::White),
        stat_line("Remaining", snapshot.remaining_count.to_string(), remaining_color),
        stat_line("Rounds", snapshot.rounds_completed.to_string(), Color::White),
    ];

    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Stats"));
    frame.render_widget(paragraph, area);
}

fn stat_line(label: &str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!(" {:<10}", label)),
        Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ])
}

/// Red once the pool can no longer cover a full draw.
pub fn remaining_color(remaining: u64, draw_count: i64) -> Color {
    match u64::try_from(draw_count) {
        Ok(count) if remaining < count => Color::Red,
        _ => Color::Green,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
