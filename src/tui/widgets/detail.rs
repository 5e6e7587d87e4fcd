//! Object detail popup with drill-down into referenced objects.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::query::SnapshotQuery;
use crate::tui::models::UNKNOWN_TYPE;
use crate::tui::state::AppState;
use crate::tui::style::Styles;
use crate::util::format_size;

use super::centered_rect;

pub fn render_detail(frame: &mut Frame, area: Rect, state: &mut AppState, query: &SnapshotQuery) {
    let Some(address) = state.current_detail() else {
        return;
    };

    let popup = centered_rect(80, 80, area);
    frame.render_widget(Clear, popup);

    let breadcrumb = state
        .detail_stack
        .iter()
        .map(|addr| format!("{:#x}", addr))
        .collect::<Vec<_>>()
        .join(" > ");
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::accent())
        .title(format!(" {} ", breadcrumb));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let Some(object) = query.get(address) else {
        // Possible only if the stack was pushed from a stale address.
        frame.render_widget(
            Paragraph::new(Span::styled("object not found", Styles::garbage())),
            inner,
        );
        return;
    };

    let type_name = query.resolve(object.name_hash).unwrap_or(UNKNOWN_TYPE);
    let reachable = query.is_reachable(address);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(vec![
        Span::styled("Address  ", Styles::dim()),
        Span::styled(format!("{:#x}", object.address), Styles::accent()),
        Span::raw("   "),
        if reachable {
            Span::styled("reachable", Styles::live())
        } else {
            Span::styled("GARBAGE", Styles::garbage())
        },
    ]));
    lines.push(Line::from(vec![
        Span::styled("Type     ", Styles::dim()),
        Span::raw(type_name.to_string()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Kind     ", Styles::dim()),
        Span::raw(object.kind.label()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Size     ", Styles::dim()),
        Span::raw(format!("{} ({} bytes)", format_size(object.size), object.size)),
    ]));
    lines.push(Line::default());

    if !object.fields.is_empty() {
        lines.push(Line::from(Span::styled("Fields", Styles::section_header())));
        for field in &object.fields {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:>6}  ", format!("+{:#x}", field.offset)), Styles::dim()),
                Span::raw(field.kind.label()),
            ]));
        }
        lines.push(Line::default());
    }

    lines.push(Line::from(Span::styled("Content", Styles::section_header())));
    for row in object.content.format().lines() {
        lines.push(Line::from(Span::styled(
            format!("  {}", row),
            Styles::default(),
        )));
    }
    lines.push(Line::default());

    lines.push(Line::from(Span::styled(
        format!("Children ({})", object.children.len()),
        Styles::section_header(),
    )));
    if object.children.is_empty() {
        state.child_selected = 0;
        lines.push(Line::from(Span::styled("  none", Styles::dim())));
    } else {
        if state.child_selected >= object.children.len() {
            state.child_selected = object.children.len() - 1;
        }
        let children_start = lines.len();
        for (index, child) in object.children.iter().enumerate() {
            let description = match query.get(*child) {
                Some(target) => {
                    let name = query.resolve(target.name_hash).unwrap_or(UNKNOWN_TYPE);
                    format!("{:#x}  {}  {}", child, format_size(target.size), name)
                }
                None => format!("{:#x}  <unresolved>", child),
            };
            let style = if index == state.child_selected {
                Styles::selected()
            } else if query.get(*child).is_none() {
                Styles::garbage()
            } else {
                Styles::default()
            };
            lines.push(Line::from(Span::styled(format!("  {}", description), style)));
        }

        // Keep the selected child inside the visible window.
        let selected_line = children_start + state.child_selected;
        let visible = inner.height as usize;
        if selected_line < state.detail_scroll {
            state.detail_scroll = selected_line;
        } else if visible > 0 && selected_line >= state.detail_scroll + visible {
            state.detail_scroll = selected_line - visible + 1;
        }
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Enter: follow child   Backspace: back   Esc: close",
        Styles::help(),
    )));

    let max_scroll = lines.len().saturating_sub(inner.height as usize);
    state.detail_scroll = state.detail_scroll.min(max_scroll);
    let paragraph = Paragraph::new(lines).scroll((state.detail_scroll as u16, 0));
    frame.render_widget(paragraph, inner);
}
