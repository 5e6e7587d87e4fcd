//! Main TUI application.

use std::io;
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::query::SnapshotQuery;
use crate::tui::models::ObjectRow;
use crate::util::parse_addr;

use super::event::{Event, EventHandler};
use super::input::{KeyAction, handle_key};
use super::render::render;
use super::state::{AppState, InputMode};

/// Main TUI application.
pub struct App {
    query: SnapshotQuery,
    state: AppState,
    should_quit: bool,
    title: String,
}

impl App {
    /// Creates the app and populates both tables from the snapshot.
    pub fn new(query: SnapshotQuery, title: String) -> Self {
        let mut state = AppState::new();

        let all: Vec<ObjectRow> = query
            .list_all()
            .map(|object| ObjectRow::from_object(object, &query))
            .collect();
        let garbage: Vec<ObjectRow> = query
            .list_garbage()
            .map(|object| ObjectRow::from_object(object, &query))
            .collect();
        state.object_table.set_items(all);
        state.garbage_table.set_items(garbage);

        Self {
            query,
            state,
            should_quit: false,
            title,
        }
    }

    /// Runs the TUI application.
    pub fn run(mut self, tick_rate: Duration) -> io::Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let events = EventHandler::new(tick_rate);

        if let Ok(size) = terminal.size() {
            self.state.terminal_width = size.width;
        }

        // Main loop
        loop {
            terminal.draw(|frame| render(frame, &mut self.state, &self.query, &self.title))?;

            match events.next() {
                Ok(Event::Tick) => {}
                Ok(Event::Key(key)) => {
                    if handle_key(&mut self.state, key) == KeyAction::Quit {
                        self.should_quit = true;
                    }
                }
                Ok(Event::Resize(width, _)) => {
                    self.state.terminal_width = width;
                }
                Err(_) => {
                    self.should_quit = true;
                }
            }

            if self.state.drill_down_requested {
                self.state.drill_down_requested = false;
                self.handle_drill_down();
            }
            if self.state.goto_requested {
                self.state.goto_requested = false;
                self.handle_goto();
            }

            if self.should_quit {
                break;
            }
        }

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        Ok(())
    }

    /// Follows the selected child of the object shown in the detail popup.
    fn handle_drill_down(&mut self) {
        let Some(address) = self.state.current_detail() else {
            return;
        };
        let Some(object) = self.query.get(address) else {
            return;
        };
        let Some(&child) = object.children.get(self.state.child_selected) else {
            return;
        };
        if self.query.get(child).is_some() {
            self.state.push_detail(child);
        } else {
            // Dangling pointer: the dump references memory outside the
            // object set. Rendered as <unresolved>, not navigable.
            self.state.status_message = Some(format!("{:#x} is not an object", child));
        }
    }

    /// Resolves a submitted goto address against the snapshot.
    fn handle_goto(&mut self) {
        let input = self.state.goto_input.trim();
        let address = match parse_addr(input) {
            Ok(address) => address,
            Err(error) => {
                self.state.goto_error = Some(error.to_string());
                return;
            }
        };
        if self.query.get(address).is_some() {
            self.state.input_mode = InputMode::Normal;
            self.state.goto_input.clear();
            self.state.goto_error = None;
            self.state.push_detail(address);
        } else {
            self.state.goto_error = Some(format!("no object at {:#x}", address));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::testutil::graph_from_edges;

    fn app() -> App {
        let query = SnapshotQuery::new(graph_from_edges(
            &[(0x100, &[0x200, 0xdead]), (0x200, &[]), (0x300, &[])],
            &[0x100],
        ));
        App::new(query, "test.dump".to_string())
    }

    #[test]
    fn test_new_populates_tables() {
        let app = app();
        assert_eq!(app.state.object_table.items.len(), 3);
        assert_eq!(app.state.garbage_table.items.len(), 1);
        assert_eq!(app.state.garbage_table.items[0].address, 0x300);
    }

    #[test]
    fn test_drill_down_follows_child() {
        let mut app = app();
        app.state.push_detail(0x100);
        app.state.child_selected = 0;
        app.handle_drill_down();
        assert_eq!(app.state.current_detail(), Some(0x200));
    }

    #[test]
    fn test_drill_down_dangling_child_stays_put() {
        let mut app = app();
        app.state.push_detail(0x100);
        app.state.child_selected = 1; // 0xdead, not an object
        app.handle_drill_down();
        assert_eq!(app.state.current_detail(), Some(0x100));
        assert!(app.state.status_message.is_some());
    }

    #[test]
    fn test_goto_valid_and_invalid() {
        let mut app = app();
        app.state.goto_input = "0x300".to_string();
        app.handle_goto();
        assert_eq!(app.state.current_detail(), Some(0x300));
        assert!(app.state.goto_error.is_none());

        app.state.close_detail();
        app.state.goto_input = "0x999".to_string();
        app.handle_goto();
        assert!(app.state.goto_error.is_some());
        assert!(!app.state.detail_open());
    }
}
