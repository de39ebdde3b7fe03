// TUI widget modules for each dashboard panel.

pub mod absent;
pub mod confirm_dialog;
pub mod draw_panel;
pub mod history;
pub mod settings;
pub mod stats;
pub mod status_bar;
