//! UI module: View components for the TUI.

pub mod patient;
pub mod result;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::domain::DISCLAIMER;
use crate::tui::styles::CardioTheme;

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = Line::from(Span::styled(DISCLAIMER, CardioTheme::text_muted()));

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(CardioTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}
