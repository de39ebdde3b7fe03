// Library root: re-exports all modules so integration tests and the binary
// can reach the app orchestrator, protocol, and TUI.

pub mod app;
pub mod protocol;
pub mod tui;
