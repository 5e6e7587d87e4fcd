//! Application state for the TUI.

use crate::tui::models::ObjectRow;
use crate::tui::table::TableState;

/// Top-level tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    /// Dump parameters and runtime statistics.
    Summary,
    /// Every object in the snapshot.
    Objects,
    /// Objects unreachable from any root.
    Garbage,
}

impl Tab {
    pub fn next(&self) -> Tab {
        match self {
            Tab::Summary => Tab::Objects,
            Tab::Objects => Tab::Garbage,
            Tab::Garbage => Tab::Summary,
        }
    }

    pub fn prev(&self) -> Tab {
        match self {
            Tab::Summary => Tab::Garbage,
            Tab::Objects => Tab::Summary,
            Tab::Garbage => Tab::Objects,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Summary => "SUM",
            Tab::Objects => "OBJ",
            Tab::Garbage => "GRB",
        }
    }
}

/// Input modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing into the table filter.
    Filter,
    /// Typing an address into the goto prompt.
    Goto,
}

/// Mutable TUI state.
///
/// The snapshot itself lives in `SnapshotQuery` and is read-only; this
/// struct holds only presentation state (selection, scroll, popups).
pub struct AppState {
    pub current_tab: Tab,
    pub input_mode: InputMode,

    pub object_table: TableState<ObjectRow>,
    pub garbage_table: TableState<ObjectRow>,
    pub summary_scroll: u16,

    /// Detail popup navigation trail: the object being shown is the last
    /// entry; Backspace pops back to the previous one.
    pub detail_stack: Vec<u64>,
    /// Selected entry in the detail view's children list.
    pub child_selected: usize,
    /// Scroll offset inside the detail popup.
    pub detail_scroll: usize,
    /// Set by input handling when Enter was pressed on a child; the app
    /// resolves it against the query service.
    pub drill_down_requested: bool,

    pub filter_input: String,
    pub goto_input: String,
    pub goto_error: Option<String>,
    /// Set by input handling when a goto address was submitted.
    pub goto_requested: bool,

    pub show_help: bool,
    pub help_scroll: u16,
    pub show_quit_confirm: bool,
    pub status_message: Option<String>,
    pub terminal_width: u16,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            current_tab: Tab::Summary,
            input_mode: InputMode::Normal,
            object_table: TableState::new(),
            garbage_table: TableState::new(),
            summary_scroll: 0,
            detail_stack: Vec::new(),
            child_selected: 0,
            detail_scroll: 0,
            drill_down_requested: false,
            filter_input: String::new(),
            goto_input: String::new(),
            goto_error: None,
            goto_requested: false,
            show_help: false,
            help_scroll: 0,
            show_quit_confirm: false,
            status_message: None,
            terminal_width: 0,
        }
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.current_tab = tab;
        self.status_message = None;
    }

    /// The object table behind the current tab, if it has one.
    pub fn active_table_mut(&mut self) -> Option<&mut TableState<ObjectRow>> {
        match self.current_tab {
            Tab::Summary => None,
            Tab::Objects => Some(&mut self.object_table),
            Tab::Garbage => Some(&mut self.garbage_table),
        }
    }

    pub fn active_table(&self) -> Option<&TableState<ObjectRow>> {
        match self.current_tab {
            Tab::Summary => None,
            Tab::Objects => Some(&self.object_table),
            Tab::Garbage => Some(&self.garbage_table),
        }
    }

    /// Address currently shown in the detail popup.
    pub fn current_detail(&self) -> Option<u64> {
        self.detail_stack.last().copied()
    }

    pub fn detail_open(&self) -> bool {
        !self.detail_stack.is_empty()
    }

    /// Opens the detail popup on `address`, or descends one level if it is
    /// already open.
    pub fn push_detail(&mut self, address: u64) {
        self.detail_stack.push(address);
        self.child_selected = 0;
        self.detail_scroll = 0;
    }

    /// Pops one drill-down level. Returns false when the popup is closed
    /// as a result.
    pub fn pop_detail(&mut self) -> bool {
        self.detail_stack.pop();
        self.child_selected = 0;
        self.detail_scroll = 0;
        self.detail_open()
    }

    pub fn close_detail(&mut self) {
        self.detail_stack.clear();
        self.child_selected = 0;
        self.detail_scroll = 0;
    }

    pub fn any_popup_open(&self) -> bool {
        self.detail_open() || self.show_help || self.show_quit_confirm
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_cycle() {
        assert_eq!(Tab::Summary.next(), Tab::Objects);
        assert_eq!(Tab::Garbage.next(), Tab::Summary);
        assert_eq!(Tab::Summary.prev(), Tab::Garbage);
        let mut tab = Tab::Summary;
        for _ in 0..3 {
            tab = tab.next();
        }
        assert_eq!(tab, Tab::Summary);
    }

    #[test]
    fn test_detail_stack() {
        let mut state = AppState::new();
        assert!(!state.detail_open());

        state.push_detail(0x100);
        state.push_detail(0x200);
        assert_eq!(state.current_detail(), Some(0x200));

        assert!(state.pop_detail());
        assert_eq!(state.current_detail(), Some(0x100));
        assert!(!state.pop_detail());
        assert!(!state.detail_open());
    }

    #[test]
    fn test_active_table_per_tab() {
        let mut state = AppState::new();
        assert!(state.active_table_mut().is_none());
        state.switch_tab(Tab::Objects);
        assert!(state.active_table_mut().is_some());
        state.switch_tab(Tab::Garbage);
        assert!(state.active_table().is_some());
    }
}
