// Status bar widget: round counter, phase indicator, last notice.

use luckydraw_core::Phase;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::NoticeLevel;
use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [phase indicator] [round counter] | [notice]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = Vec::new();

    let (dot, dot_color) = phase_indicator(state.snapshot.phase);
    spans.push(Span::styled(format!(" {} ", dot), Style::default().fg(dot_color)));

    spans.push(Span::styled(
        format!("Round {}", state.snapshot.round),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::styled(
        format!(" ({})", state.snapshot.phase),
        Style::default().fg(Color::Gray),
    ));

    if let Some(notice) = &state.notice {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            notice.text.clone(),
            Style::default().fg(notice_color(notice.level)),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Return the phase dot character and its color.
pub fn phase_indicator(phase: Phase) -> (&'static str, Color) {
    match phase {
        Phase::Idle => ("●", Color::Gray),
        Phase::Drawing => ("●", Color::Yellow),
        Phase::Reviewing => ("●", Color::Green),
    }
}

pub fn notice_color(level: NoticeLevel) -> Color {
    match level {
        NoticeLevel::Info => Color::Cyan,
        NoticeLevel::Success => Color::Green,
        NoticeLevel::Warning => Color::Red,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
