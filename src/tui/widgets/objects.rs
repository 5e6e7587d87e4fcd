//! Objects/Garbage table rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table};

use crate::tui::state::{AppState, InputMode};
use crate::tui::style::Styles;
use crate::tui::table::{TableRow, TableState};
use crate::tui::models::ObjectRow;
use crate::util::format_size;

const COLUMN_WIDTHS: [Constraint; 5] = [
    Constraint::Length(18),
    Constraint::Length(6),
    Constraint::Length(10),
    Constraint::Length(6),
    Constraint::Min(20),
];

pub fn render_object_table(frame: &mut Frame, area: Rect, state: &mut AppState) {
    let filter_line = matches!(state.input_mode, InputMode::Filter)
        || state
            .active_table()
            .is_some_and(|table| table.filter.is_some());
    let table_height = if filter_line {
        area.height.saturating_sub(1)
    } else {
        area.height
    };
    let table_area = Rect { height: table_height, ..area };

    let filter_input = state.filter_input.clone();
    let input_mode = state.input_mode;
    let Some(table) = state.active_table_mut() else {
        return;
    };

    render_rows(frame, table_area, table);

    if filter_line {
        let footer_area = Rect {
            y: area.y + table_height,
            height: 1,
            ..table_area
        };
        let text = if input_mode == InputMode::Filter {
            Line::from(vec![
                Span::styled("/", Styles::accent()),
                Span::styled(filter_input, Styles::filter_input()),
                Span::styled("█", Styles::filter_input()),
            ])
        } else {
            Line::from(vec![
                Span::styled("filter: ", Styles::dim()),
                Span::raw(table.filter.clone().unwrap_or_default()),
                Span::styled("  (Esc clears)", Styles::dim()),
            ])
        };
        frame.render_widget(Paragraph::new(text), footer_area);
    }
}

fn render_rows(frame: &mut Frame, area: Rect, table: &mut TableState<ObjectRow>) {
    // One line is taken by the header row.
    let visible = area.height.saturating_sub(1) as usize;
    if table.selected < table.scroll_offset {
        table.scroll_offset = table.selected;
    } else if visible > 0 && table.selected >= table.scroll_offset + visible {
        table.scroll_offset = table.selected - visible + 1;
    }

    let filtered = table.filtered_items();
    let total = filtered.len();

    let header_cells: Vec<Cell> = ObjectRow::headers()
        .into_iter()
        .enumerate()
        .map(|(index, name)| {
            let marker = if index == table.sort_column {
                if table.sort_ascending { "▲" } else { "▼" }
            } else {
                ""
            };
            Cell::from(format!("{}{}", name, marker))
        })
        .collect();
    let header = Row::new(header_cells).style(Styles::table_header());

    let rows: Vec<Row> = filtered
        .iter()
        .enumerate()
        .skip(table.scroll_offset)
        .take(visible)
        .map(|(index, item)| {
            let base = if item.reachable {
                Styles::default()
            } else {
                Styles::garbage()
            };
            let style = if index == table.selected {
                base.patch(Styles::selected())
            } else {
                base
            };
            Row::new(vec![
                Cell::from(format!("{:#x}", item.address)),
                Cell::from(item.kind),
                Cell::from(format_size(item.size)),
                Cell::from(item.children.to_string()),
                Cell::from(item.type_name.clone()),
            ])
            .style(style)
        })
        .collect();

    let empty = rows.is_empty();
    let widget = Table::new(rows, COLUMN_WIDTHS).header(header);
    frame.render_widget(widget, area);

    if empty {
        let message = if total == 0 && table.filter.is_some() {
            "no objects match the filter"
        } else {
            "no objects"
        };
        let message_area = Rect {
            y: area.y + 1,
            height: 1,
            ..area
        };
        frame.render_widget(
            Paragraph::new(Span::styled(format!("  {}", message), Styles::dim())),
            message_area,
        );
    }
}
