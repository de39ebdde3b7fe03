// Application state and orchestration logic.
//
// The event loop owns the lottery `Session`. It applies user commands from
// the TUI, runs the cosmetic draw delay on a spawned timer task, and pushes
// snapshots and notices back to the TUI render loop.

use std::time::Duration;

use chrono::Local;
use luckydraw_core::config::Config;
use luckydraw_core::round::join_numbers;
use luckydraw_core::{LotteryError, Session};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::protocol::{AppSnapshot, DrawEvent, HistoryEntry, Notice, UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub session: Session,
    rng: StdRng,
    /// How long the dashboard shows "Drawing..." before the numbers land.
    pub draw_delay: Duration,
    /// Sender handed to draw timer tasks so they can report back to the loop.
    pub draw_tx: mpsc::Sender<DrawEvent>,
}

impl AppState {
    pub fn new(config: Config, draw_tx: mpsc::Sender<DrawEvent>) -> Self {
        let rng = match config.seed {
            Some(seed) => {
                info!("Using fixed RNG seed {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };
        let session = Session::new(config.draw);
        let draw_delay = Duration::from_millis(config.ui.draw_delay_ms);

        AppState {
            config,
            session,
            rng,
            draw_delay,
            draw_tx,
        }
    }

    /// Capture the session for the TUI.
    pub fn build_snapshot(&self) -> AppSnapshot {
        let session = &self.session;
        let history = session
            .history()
            .iter()
            .map(|round| HistoryEntry {
                index: round.index,
                numbers: round.numbers.clone(),
                absent_numbers: round.absent_numbers.clone(),
                timestamp: round.formatted_timestamp(&self.config.ui.timestamp_format),
            })
            .collect();

        AppSnapshot {
            round: session.current_round(),
            phase: session.phase(),
            config: *session.config(),
            current: session.current_draw().iter().copied().collect(),
            absent: session.absent().iter().copied().collect(),
            unreplaced_absent: session.unreplaced_absent(),
            winning_count: session.winning_count(),
            remaining_count: session.remaining_count(),
            rounds_completed: session.rounds_completed(),
            history,
        }
    }

    /// Apply one command to the session and describe the outcome for the
    /// operator. Errors are reported, never propagated: the session is left
    /// as it was.
    pub fn apply_command(&mut self, cmd: UserCommand) -> Option<Notice> {
        let result = match cmd {
            UserCommand::Draw => self.session.begin_draw().map(|()| {
                self.spawn_draw_timer();
                Some(Notice::info("Drawing..."))
            }),
            UserCommand::RedrawAbsent => self.session.begin_redraw().map(|count| {
                self.spawn_draw_timer();
                Some(Notice::info(format!("Redrawing {} absent number(s)...", count)))
            }),
            UserCommand::MarkAbsent(number) => self.session.mark_absent(number).map(|moved| {
                moved.then(|| Notice::info(format!("{} marked absent", number)))
            }),
            UserCommand::ConfirmRound => self
                .session
                .confirm_round(Local::now())
                .map(|round| Some(Notice::success(round.summary()))),
            UserCommand::ResetAll => self.session.reset_all().map(|()| {
                Some(Notice::info("All rounds and winners have been reset"))
            }),
            UserCommand::EditField { field, input } => self
                .session
                .apply_field_input(field, &input)
                .map(|value| {
                    info!("{} set to {}", field, value);
                    Some(Notice::info(format!("{} set to {}", field, value)))
                }),
            UserCommand::Quit => Ok(None),
        };

        result.unwrap_or_else(|e| Some(report(&e)))
    }

    /// Land the pending draw once the timer fires.
    pub fn complete_draw(&mut self) -> Notice {
        match self.session.finish_draw(&mut self.rng) {
            Ok(numbers) => {
                info!(
                    "Round {} numbers: {}",
                    self.session.current_round(),
                    join_numbers(&numbers)
                );
                Notice::info(format!("Drawn: {}", join_numbers(&numbers)))
            }
            Err(e) => report(&e),
        }
    }

    fn spawn_draw_timer(&self) {
        let tx = self.draw_tx.clone();
        let delay = self.draw_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(DrawEvent::Ready).await;
        });
    }
}

/// Turn a session error into an operator warning.
fn report(e: &LotteryError) -> Notice {
    warn!("Action aborted: {}", e);
    Notice::warning(e.to_string())
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Listens on two channels using `tokio::select!`:
/// 1. User commands from the TUI
/// 2. Draw timer events
///
/// Pushes UI updates through `ui_tx` for the TUI render loop.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut draw_rx: mpsc::Receiver<DrawEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    let _ = ui_tx
        .send(UiUpdate::StateSnapshot(Box::new(state.build_snapshot())))
        .await;

    loop {
        tokio::select! {
            // --- User commands ---
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            // --- Draw timer ---
            Some(DrawEvent::Ready) = draw_rx.recv() => {
                let notice = state.complete_draw();
                send_updates(&state, Some(notice), &ui_tx).await;
            }
        }
    }

    info!("Application event loop exiting");
    Ok(())
}

/// Handle a user command from the TUI.
async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    let notice = state.apply_command(cmd);
    send_updates(state, notice, ui_tx).await;
}

async fn send_updates(state: &AppState, notice: Option<Notice>, ui_tx: &mpsc::Sender<UiUpdate>) {
    if let Some(notice) = notice {
        let _ = ui_tx.send(UiUpdate::Notice(notice)).await;
    }
    let _ = ui_tx
        .send(UiUpdate::StateSnapshot(Box::new(state.build_snapshot())))
        .await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
