// Round state: the session object that tracks the current draw, absent
// marks, cumulative winners, the round counter and the history log.
//
// Phases:
//
//   Idle ──begin_draw──> Drawing ──finish_draw──> Reviewing
//     ^                    ^   │ (error: back to prior phase)     │
//     │                    │   └──────────────────────────────────┤
//     │                    └──begin_draw / begin_redraw───────────┤
//     └────────────────confirm_round / reset_all──────────────────┘

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Local};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{ConfigField, DrawConfig};
use crate::draw;
use crate::error::LotteryError;

/// Where the session is in the draw-confirm cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// No active draw.
    Idle,
    /// A draw is in flight; input is disabled until it lands.
    Drawing,
    /// Numbers are displayed; the operator may mark absences, redraw, or confirm.
    Reviewing,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Idle => "idle",
            Phase::Drawing => "drawing",
            Phase::Reviewing => "reviewing",
        })
    }
}

/// A confirmed round, as recorded in history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Round {
    /// 1-based round number.
    pub index: u32,
    /// Numbers confirmed as winners (present at the event).
    pub numbers: Vec<i64>,
    /// Numbers drawn in this round but marked absent. They are consumed from
    /// the pool all the same.
    pub absent_numbers: Vec<i64>,
    pub timestamp: DateTime<Local>,
}

impl Round {
    /// One-line announcement for the operator.
    pub fn summary(&self) -> String {
        let mut text = format!(
            "Round {} complete! Winners: {}",
            self.index,
            join_numbers(&self.numbers)
        );
        if !self.absent_numbers.is_empty() {
            text.push_str(&format!(
                " | Absent (removed from pool): {}",
                join_numbers(&self.absent_numbers)
            ));
        }
        text
    }

    pub fn formatted_timestamp(&self, fmt: &str) -> String {
        self.timestamp.format(fmt).to_string()
    }
}

/// Comma-separated list of numbers, e.g. "3, 17, 42".
pub fn join_numbers(numbers: &[i64]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// What `finish_draw` will do when the cosmetic delay ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingDraw {
    /// A fresh draw of `draw_count` numbers.
    Full,
    /// Replacements for this many absent numbers.
    Replacement(usize),
}

/// The complete lottery session.
#[derive(Debug, Clone)]
pub struct Session {
    config: DrawConfig,
    phase: Phase,
    /// Phase to return to if the pending draw fails.
    phase_before_draw: Phase,
    pending: Option<PendingDraw>,
    winning: BTreeSet<i64>,
    current: BTreeSet<i64>,
    absent: BTreeSet<i64>,
    /// Absent marks made since the last redraw.
    unreplaced: usize,
    history: Vec<Round>,
    round_index: u32,
}

impl Session {
    pub fn new(config: DrawConfig) -> Self {
        Session {
            config,
            phase: Phase::Idle,
            phase_before_draw: Phase::Idle,
            pending: None,
            winning: BTreeSet::new(),
            current: BTreeSet::new(),
            absent: BTreeSet::new(),
            unreplaced: 0,
            history: Vec::new(),
            round_index: 1,
        }
    }

    // -- Accessors --

    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pending(&self) -> Option<PendingDraw> {
        self.pending
    }

    pub fn winning(&self) -> &BTreeSet<i64> {
        &self.winning
    }

    pub fn current_draw(&self) -> &BTreeSet<i64> {
        &self.current
    }

    pub fn absent(&self) -> &BTreeSet<i64> {
        &self.absent
    }

    /// Absent numbers still waiting for a replacement.
    pub fn unreplaced_absent(&self) -> usize {
        self.unreplaced
    }

    pub fn history(&self) -> &[Round] {
        &self.history
    }

    pub fn current_round(&self) -> u32 {
        self.round_index
    }

    pub fn winning_count(&self) -> usize {
        self.winning.len()
    }

    /// Numbers in the configured range that have not been awarded yet.
    pub fn remaining_count(&self) -> u64 {
        let awarded_in_range = self
            .winning
            .iter()
            .filter(|n| self.config.contains(**n))
            .count() as u64;
        self.config.span().saturating_sub(awarded_in_range)
    }

    pub fn rounds_completed(&self) -> usize {
        self.history.len()
    }

    // -- Configuration --

    /// Apply operator input to a single field; see `DrawConfig::apply_input`.
    ///
    /// Only allowed in Idle: numbers on screen were drawn under the current
    /// range and count, so the settings stay fixed until the round is
    /// confirmed or reset.
    pub fn apply_field_input(
        &mut self,
        field: ConfigField,
        input: &str,
    ) -> Result<i64, LotteryError> {
        if self.phase != Phase::Idle {
            return Err(LotteryError::InvalidTransition {
                action: "change settings",
                phase: self.phase,
            });
        }
        self.config.apply_input(field, input)
    }

    // -- Drawing --

    /// Start a full draw. Allowed from Idle or Reviewing; an unconfirmed draw
    /// is replaced only once the new one succeeds.
    pub fn begin_draw(&mut self) -> Result<(), LotteryError> {
        self.require_not_drawing("start a draw")?;
        self.config.validate()?;
        self.enter_drawing(PendingDraw::Full);
        Ok(())
    }

    /// Start a redraw for the absent numbers not yet replaced.
    /// Returns how many numbers will be drawn.
    ///
    /// Absent marks survive a redraw and stay excluded from the pool. Only
    /// marks made since the last redraw are replaced, so redrawing twice
    /// without new marks is rejected.
    pub fn begin_redraw(&mut self) -> Result<usize, LotteryError> {
        if self.phase != Phase::Reviewing || self.unreplaced == 0 {
            return Err(LotteryError::InvalidTransition {
                action: "redraw absent numbers",
                phase: self.phase,
            });
        }
        self.config.validate()?;
        let count = self.unreplaced;
        self.enter_drawing(PendingDraw::Replacement(count));
        Ok(count)
    }

    /// Perform the pending draw. On failure the phase reverts to what it was
    /// before `begin_draw`/`begin_redraw` and nothing else changes.
    pub fn finish_draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Vec<i64>, LotteryError> {
        let Some(pending) = self.pending.take() else {
            return Err(LotteryError::InvalidTransition {
                action: "finish a draw",
                phase: self.phase,
            });
        };

        let result = match pending {
            PendingDraw::Full => draw::draw(&self.config, &self.winning, rng),
            PendingDraw::Replacement(count) => {
                let exclude: BTreeSet<i64> = self
                    .winning
                    .iter()
                    .chain(&self.current)
                    .chain(&self.absent)
                    .copied()
                    .collect();
                draw::redraw(count, &self.config, &exclude, rng)
            }
        };

        let numbers = match result {
            Ok(numbers) => numbers,
            Err(e) => {
                self.phase = self.phase_before_draw;
                return Err(e);
            }
        };

        match pending {
            PendingDraw::Full => {
                self.current = numbers.iter().copied().collect();
                self.absent.clear();
                debug!("Round {} drawn: {:?}", self.round_index, numbers);
            }
            PendingDraw::Replacement(_) => {
                self.current.extend(numbers.iter().copied());
                debug!(
                    "Round {} replacements drawn: {:?}",
                    self.round_index, numbers
                );
            }
        }
        self.unreplaced = 0;
        self.phase = Phase::Reviewing;
        Ok(numbers)
    }

    /// `begin_draw` and `finish_draw` in one step.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Vec<i64>, LotteryError> {
        self.begin_draw()?;
        self.finish_draw(rng)
    }

    /// `begin_redraw` and `finish_draw` in one step.
    pub fn redraw_absent<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Vec<i64>, LotteryError> {
        self.begin_redraw()?;
        self.finish_draw(rng)
    }

    // -- Reviewing --

    /// Move `number` from the current draw to the absent set.
    ///
    /// Returns `Ok(false)` when the number was already absent.
    pub fn mark_absent(&mut self, number: i64) -> Result<bool, LotteryError> {
        if self.phase != Phase::Reviewing {
            return Err(LotteryError::InvalidTransition {
                action: "mark a number absent",
                phase: self.phase,
            });
        }
        if self.absent.contains(&number) {
            return Ok(false);
        }
        if !self.current.remove(&number) {
            return Err(LotteryError::NotInCurrentDraw { number });
        }
        self.absent.insert(number);
        self.unreplaced += 1;
        debug!("Marked {} absent in round {}", number, self.round_index);
        Ok(true)
    }

    /// Record the current draw as a finished round.
    ///
    /// Both the present and the absent numbers join the winning set, so
    /// neither can be drawn again until `reset_all`.
    pub fn confirm_round(&mut self, now: DateTime<Local>) -> Result<&Round, LotteryError> {
        if self.phase != Phase::Reviewing {
            return Err(LotteryError::InvalidTransition {
                action: "confirm the round",
                phase: self.phase,
            });
        }
        if self.current.is_empty() {
            return Err(LotteryError::NothingToConfirm);
        }

        let numbers: Vec<i64> = std::mem::take(&mut self.current).into_iter().collect();
        let absent_numbers: Vec<i64> = std::mem::take(&mut self.absent).into_iter().collect();
        self.winning.extend(numbers.iter().copied());
        self.winning.extend(absent_numbers.iter().copied());

        let round = Round {
            index: self.round_index,
            numbers,
            absent_numbers,
            timestamp: now,
        };
        info!("{}", round.summary());

        self.history.push(round);
        self.round_index += 1;
        self.unreplaced = 0;
        self.phase = Phase::Idle;

        Ok(&self.history[self.history.len() - 1])
    }

    /// Clear every winner, the history, and the current round. The caller is
    /// responsible for getting the operator's confirmation first.
    pub fn reset_all(&mut self) -> Result<(), LotteryError> {
        self.require_not_drawing("reset")?;
        self.winning.clear();
        self.history.clear();
        self.current.clear();
        self.absent.clear();
        self.unreplaced = 0;
        self.round_index = 1;
        self.phase = Phase::Idle;
        info!("Session reset: all winners and history cleared");
        Ok(())
    }

    // -- Helpers --

    fn enter_drawing(&mut self, pending: PendingDraw) {
        self.phase_before_draw = self.phase;
        self.pending = Some(pending);
        self.phase = Phase::Drawing;
    }

    fn require_not_drawing(&self, action: &'static str) -> Result<(), LotteryError> {
        if self.phase == Phase::Drawing {
            return Err(LotteryError::InvalidTransition {
                action,
                phase: self.phase,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
