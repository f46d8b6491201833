//! Ratatui front-end: a Form tab and a List tab driving the two controllers.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
