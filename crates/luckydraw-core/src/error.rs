// Operator-facing errors raised by the draw engine and the round session.
//
// Every variant is recoverable: the action that raised it is aborted and the
// session is left exactly as it was.

use thiserror::Error;

use crate::round::Phase;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LotteryError {
    #[error("invalid configuration for `{field}`: {message}")]
    InvalidConfiguration { field: String, message: String },

    #[error("not enough numbers left in the pool: {remaining} remaining, {requested} requested")]
    InsufficientPool { remaining: usize, requested: usize },

    #[error("invalid value {input:?} for {field}")]
    InvalidNumericInput { field: String, input: String },

    #[error("cannot {action} while {phase}")]
    InvalidTransition { action: &'static str, phase: Phase },

    #[error("number {number} is not part of the current draw")]
    NotInCurrentDraw { number: i64 },

    #[error("nothing to confirm: draw some numbers first")]
    NothingToConfirm,
}

impl LotteryError {
    pub(crate) fn invalid_config(field: &str, message: impl Into<String>) -> Self {
        LotteryError::InvalidConfiguration {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
