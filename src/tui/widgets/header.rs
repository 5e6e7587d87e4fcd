//! Top header bar: snapshot name, tabs and partition counts.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::query::SnapshotQuery;
use crate::tui::state::{AppState, Tab};
use crate::tui::style::Styles;

pub fn render_header(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    query: &SnapshotQuery,
    title: &str,
) {
    let overview = query.describe();
    let mut spans = vec![
        Span::styled(format!(" heaplot {} ", title), Styles::header()),
        Span::raw(" "),
    ];

    for (index, tab) in [Tab::Summary, Tab::Objects, Tab::Garbage]
        .into_iter()
        .enumerate()
    {
        let style = if state.current_tab == tab {
            Styles::tab_active()
        } else {
            Styles::tab_inactive()
        };
        spans.push(Span::styled(
            format!("{}:{} ", index + 1, tab.title()),
            style,
        ));
    }

    spans.push(Span::styled(
        format!(
            "| {} objects, {} garbage ",
            overview.object_count, overview.garbage_count
        ),
        Styles::dim(),
    ));

    if let Some(ref message) = state.status_message {
        spans.push(Span::styled(format!("| {}", message), Styles::help_key()));
    } else {
        spans.push(Span::styled("| h:help q:quit", Styles::help()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
