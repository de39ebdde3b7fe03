// Library root: draw engine, round session, configuration and errors.
//
// Nothing in this crate touches the terminal; the TUI crate drives a
// `Session` through commands and renders snapshots of it.

pub mod config;
pub mod draw;
pub mod error;
pub mod round;

pub use error::LotteryError;
pub use round::{Phase, Round, Session};
