//! TUI module: Terminal User Interface using Ratatui.
//!
//! Two screens:
//! - Patient form with inline validation errors and a help panel
//! - Prediction result with risk gauge, guidance and report download

mod app;
mod styles;
mod ui;

pub use app::{App, Screen};
pub use styles::CardioTheme;
