// Terminal UI implementation using ratatui
// The pretty face of hindex

pub mod app;
pub mod help_ui;
pub mod runner;
pub mod sparkline;
pub mod ui;
pub mod view;

pub use app::{App, InputMode, PendingAction};
pub use runner::run_tui;
pub use view::{project, ViewModel};
