// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors the lottery session. The app
// orchestrator pushes `UiUpdate` messages over an mpsc channel; the TUI
// applies them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use luckydraw_core::config::ConfigField;
use luckydraw_core::Phase;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;

use crate::protocol::{AppSnapshot, Notice, UiUpdate, UserCommand};

use layout::{build_layout, AppLayout};

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// State of the settings panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsState {
    /// Whether keyboard focus is on the settings panel.
    pub open: bool,
    /// Field under the cursor.
    pub field: ConfigField,
    /// Whether the field's text is being edited.
    pub editing: bool,
    /// Text typed so far while editing.
    pub buffer: String,
}

impl Default for SettingsState {
    fn default() -> Self {
        SettingsState {
            open: false,
            field: ConfigField::Min,
            editing: false,
            buffer: String::new(),
        }
    }
}

/// TUI-local state that mirrors the application state for rendering.
///
/// Updated via `UiUpdate` messages from the app orchestrator and by local
/// key handling (cursor, scrolling, dialogs).
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Latest session snapshot.
    pub snapshot: AppSnapshot,
    /// Last message for the operator.
    pub notice: Option<Notice>,
    /// Index into `snapshot.current` of the highlighted tile.
    pub selected_tile: usize,
    pub settings: SettingsState,
    /// Rows scrolled past at the top of the history log.
    pub history_scroll: usize,
    /// Whether the quit confirmation dialog is showing.
    pub confirm_quit: bool,
    /// Whether the reset confirmation dialog is showing.
    pub confirm_reset: bool,
}

impl ViewState {
    /// Apply a full state snapshot from the app orchestrator.
    ///
    /// The tile cursor is clamped to the new draw; scroll and dialog state
    /// are left unchanged.
    pub fn apply_snapshot(&mut self, snapshot: AppSnapshot) {
        self.selected_tile = match snapshot.current.len() {
            0 => 0,
            len => self.selected_tile.min(len - 1),
        };
        self.snapshot = snapshot;
    }

    /// Number currently under the tile cursor, if any.
    pub fn selected_number(&self) -> Option<i64> {
        self.snapshot.current.get(self.selected_tile).copied()
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::StateSnapshot(snapshot) => {
            state.apply_snapshot(*snapshot);
        }
        UiUpdate::Notice(notice) => {
            state.notice = Some(notice);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame, with any open dialog on top.
fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::settings::render(frame, layout.settings, state);
    widgets::stats::render(frame, layout.stats, &state.snapshot);
    widgets::draw_panel::render(frame, layout.draw_panel, state);
    widgets::absent::render(frame, layout.absent, &state.snapshot);
    widgets::history::render(frame, layout.history, state);
    render_help_bar(frame, &layout, state);

    if state.confirm_reset {
        widgets::confirm_dialog::render(
            frame,
            frame.area(),
            " Reset? ",
            "Clear all winners and history?",
        );
    } else if state.confirm_quit {
        widgets::confirm_dialog::render(frame, frame.area(), " Quit? ", "Really quit?");
    }
}

/// Key hints for the current input mode.
fn help_text(state: &ViewState) -> &'static str {
    if state.settings.editing {
        " Enter:Save | Tab:Save+Next | Esc:Cancel"
    } else if state.settings.open {
        " Tab/\u{2191}\u{2193}:Field | Enter:Edit | Esc/s:Close"
    } else if state.snapshot.phase == Phase::Reviewing {
        " d:Draw | \u{2190}\u{2192}:Select | x:Absent | r:Redraw | c:Confirm | R:Reset | s:Settings | q:Quit"
    } else {
        " d:Draw | s:Settings | \u{2191}\u{2193}:History | R:Reset | q:Quit"
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        help_text(state),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    // 1. Initialize terminal
    let mut terminal = ratatui::init();

    // 2. Restore the terminal before the original panic hook prints.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    // 3. Create ViewState
    let mut view_state = ViewState::default();

    // 4. Create crossterm EventStream for async keyboard input
    let mut event_stream = EventStream::new();

    // 5. Create render interval (~30fps)
    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    // 6. Main loop
    let result = loop {
        tokio::select! {
            // UI updates from the app orchestrator
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // Channel closed: app is shutting down
                    None => break Ok(()),
                }
            }

            // Keyboard input
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break Ok(());
                            }
                        }
                    }
                    // Mouse and resize events: the next tick redraws.
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break Err(e.into()),
                    None => break Ok(()),
                }
            }

            // Render tick
            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(e.into());
                }
            }
        }
    };

    // 7. Restore terminal
    ratatui::restore();

    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
