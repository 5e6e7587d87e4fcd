//! TUI widgets for heaplot.

mod detail;
mod goto;
mod header;
mod help;
mod objects;
mod quit_confirm;
mod summary;

pub use detail::render_detail;
pub use goto::render_goto;
pub use header::render_header;
pub use help::render_help;
pub use objects::render_object_table;
pub use quit_confirm::render_quit_confirm;
pub use summary::render_summary;

use ratatui::layout::Rect;

/// Centered popup rectangle taking the given percentage of the area.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
