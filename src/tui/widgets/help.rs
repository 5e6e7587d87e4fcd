//! Keybinding help popup.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::state::AppState;
use crate::tui::style::Styles;

use super::centered_rect;

const BINDINGS: &[(&str, &str)] = &[
    ("Tab / Shift-Tab", "next / previous tab"),
    ("1 2 3", "jump to Summary / Objects / Garbage"),
    ("Up/Down, j/k", "move selection or scroll"),
    ("PgUp / PgDn", "page through the table"),
    ("Enter", "open object detail / follow selected child"),
    ("Backspace", "back one drill-down level"),
    ("Esc", "close popup or clear filter"),
    ("s", "cycle sort column"),
    ("d", "toggle sort direction"),
    ("/", "filter by type, kind or address"),
    ("g", "go to address"),
    ("h, ?, F1", "toggle this help"),
    ("q", "quit (with confirmation)"),
    ("Ctrl-C", "quit immediately"),
];

pub fn render_help(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::accent())
        .title(" Help ");
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let lines: Vec<Line> = BINDINGS
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("  {:<16}", keys), Styles::help_key()),
                Span::styled((*action).to_string(), Styles::help()),
            ])
        })
        .collect();

    let max_scroll = (lines.len() as u16).saturating_sub(inner.height);
    let paragraph = Paragraph::new(lines).scroll((state.help_scroll.min(max_scroll), 0));
    frame.render_widget(paragraph, inner);
}
