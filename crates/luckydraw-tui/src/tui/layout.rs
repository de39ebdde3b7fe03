// Screen layout: panel arrangement and sizing.
//
// Divides the terminal area into fixed zones for the lottery dashboard:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +----------------+---------------------------------+
// | Sidebar (30%)  | Draw Panel (8 rows)             |
// | +- Settings -+ +---------------------------------+
// | +- Stats ----+ | Absent (3 rows)                 |
// |                +---------------------------------+
// |                | History (fill)                  |
// +----------------+---------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: round number, phase, last notice.
    pub status_bar: Rect,
    /// Sidebar top: min/max/count fields.
    pub settings: Rect,
    /// Sidebar bottom: winners, remaining pool, rounds completed.
    pub stats: Rect,
    /// Main column top: the current draw as tiles.
    pub draw_panel: Rect,
    /// Main column middle: numbers marked absent this round.
    pub absent: Rect,
    /// Main column bottom: confirmed rounds, newest first.
    pub history: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the dashboard layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    // Vertical: status(1) | middle(fill) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(10),   // middle section (sidebar + main)
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let status_bar = vertical[0];
    let middle = vertical[1];
    let help_bar = vertical[2];

    // Horizontal: sidebar (30%) | main column (70%)
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(middle);

    // Sidebar: settings (3 fields + hint + borders) | stats
    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(5)])
        .split(horizontal[0]);

    // Main column: draw panel | absent | history
    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .split(horizontal[1]);

    AppLayout {
        status_bar,
        settings: sidebar[0],
        stats: sidebar[1],
        draw_panel: main[0],
        absent: main[1],
        history: main[2],
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
