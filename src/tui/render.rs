//! Frame composition: header, active tab, popup overlays.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::query::SnapshotQuery;
use crate::tui::state::{AppState, InputMode, Tab};
use crate::tui::widgets;

pub fn render(frame: &mut Frame, state: &mut AppState, query: &SnapshotQuery, title: &str) {
    let area = frame.area();
    state.terminal_width = area.width;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    widgets::render_header(frame, chunks[0], state, query, title);

    match state.current_tab {
        Tab::Summary => widgets::render_summary(frame, chunks[1], query, state.summary_scroll),
        Tab::Objects | Tab::Garbage => widgets::render_object_table(frame, chunks[1], state),
    }

    // Popups stack in this order; quit confirmation always wins.
    if state.detail_open() {
        widgets::render_detail(frame, area, state, query);
    }
    if state.input_mode == InputMode::Goto {
        widgets::render_goto(frame, area, state);
    }
    if state.show_help {
        widgets::render_help(frame, area, state);
    }
    if state.show_quit_confirm {
        widgets::render_quit_confirm(frame, area);
    }
}
