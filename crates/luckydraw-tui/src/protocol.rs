// Messages exchanged between the TUI, the app orchestrator, and the draw timer.

use luckydraw_core::config::{ConfigField, DrawConfig};
use luckydraw_core::Phase;

/// Commands the TUI sends to the app orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Start a fresh draw of `draw_count` numbers.
    Draw,
    /// Draw replacements for the absent numbers not yet replaced.
    RedrawAbsent,
    MarkAbsent(i64),
    ConfirmRound,
    /// Wipe winners and history. The TUI only sends this after the operator
    /// confirmed the dialog.
    ResetAll,
    /// Raw text committed for one settings field.
    EditField { field: ConfigField, input: String },
    Quit,
}

/// Fired by the draw timer task when the cosmetic delay has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawEvent {
    Ready,
}

/// Updates the app orchestrator pushes to the TUI.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    StateSnapshot(Box<AppSnapshot>),
    Notice(Notice),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
}

/// A short message for the operator, shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }
}

/// One confirmed round, pre-formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub index: u32,
    pub numbers: Vec<i64>,
    pub absent_numbers: Vec<i64>,
    pub timestamp: String,
}

/// Everything the dashboard renders, captured after each command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSnapshot {
    pub round: u32,
    pub phase: Phase,
    pub config: DrawConfig,
    /// Current draw, ascending.
    pub current: Vec<i64>,
    /// Absent marks this round, ascending.
    pub absent: Vec<i64>,
    pub unreplaced_absent: usize,
    pub winning_count: usize,
    pub remaining_count: u64,
    pub rounds_completed: usize,
    /// Oldest first.
    pub history: Vec<HistoryEntry>,
}

impl Default for AppSnapshot {
    fn default() -> Self {
        let config = DrawConfig::default();
        AppSnapshot {
            round: 1,
            phase: Phase::Idle,
            config,
            current: Vec::new(),
            absent: Vec::new(),
            unreplaced_absent: 0,
            winning_count: 0,
            remaining_count: config.span(),
            rounds_completed: 0,
            history: Vec::new(),
        }
    }
}
