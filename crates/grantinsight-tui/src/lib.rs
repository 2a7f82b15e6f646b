// Terminal UI implementation using ratatui
// Landing screen, sidebar and the dashboard modules

pub mod app;
pub mod help_ui;
pub mod opportunities_ui;
pub mod overview_ui;
pub mod runner;
pub mod ui;

pub use app::{App, InputMode, Screen};
pub use runner::{handle_key, run_tui};
