//! Quit confirmation popup.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::style::Styles;

pub fn render_quit_confirm(frame: &mut Frame, area: Rect) {
    let width = 30.min(area.width);
    let height = 3;
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::garbage())
        .title(" Quit? ");
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Enter", Styles::help_key()),
            Span::styled(" quit  ", Styles::help()),
            Span::styled("Esc", Styles::help_key()),
            Span::styled(" stay", Styles::help()),
        ])),
        inner,
    );
}
