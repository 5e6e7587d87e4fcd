//! Goto-address prompt popup.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::state::AppState;
use crate::tui::style::Styles;

pub fn render_goto(frame: &mut Frame, area: Rect, state: &AppState) {
    let width = 46.min(area.width);
    let height = 4;
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::accent())
        .title(" Go to address ");
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut lines = vec![Line::from(vec![
        Span::styled("> ", Styles::accent()),
        Span::styled(state.goto_input.clone(), Styles::filter_input()),
        Span::styled("█", Styles::filter_input()),
    ])];
    if let Some(ref error) = state.goto_error {
        lines.push(Line::from(Span::styled(error.clone(), Styles::garbage())));
    } else {
        lines.push(Line::from(Span::styled(
            "hex (0x...) or decimal, Esc cancels",
            Styles::help(),
        )));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}
