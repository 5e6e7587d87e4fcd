//! Input handling and keybindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::{AppState, InputMode, Tab};

/// Result of handling a key event.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// No action, continue.
    None,
    /// Quit the application.
    Quit,
}

/// Handles key input and updates state.
pub fn handle_key(state: &mut AppState, key: KeyEvent) -> KeyAction {
    if state.show_quit_confirm {
        return handle_quit_confirm(state, key);
    }
    match state.input_mode {
        InputMode::Normal => handle_normal_mode(state, key),
        InputMode::Filter => handle_filter_mode(state, key),
        InputMode::Goto => handle_goto_mode(state, key),
    }
}

fn handle_quit_confirm(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('Q') => {
            state.show_quit_confirm = false;
            KeyAction::Quit
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.show_quit_confirm = false;
            KeyAction::Quit
        }
        KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
            state.show_quit_confirm = false;
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}

/// Handles keys in normal mode.
fn handle_normal_mode(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        // Quit
        KeyCode::Char('q') | KeyCode::Char('Q') => {
            state.show_quit_confirm = true;
            KeyAction::None
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,

        // Tab navigation (blocked while a popup is open)
        KeyCode::Tab
        | KeyCode::BackTab
        | KeyCode::Char('1')
        | KeyCode::Char('2')
        | KeyCode::Char('3')
            if state.any_popup_open() =>
        {
            state.status_message = Some("Close popup (Esc) before switching tabs".to_string());
            KeyAction::None
        }
        KeyCode::Tab => {
            state.switch_tab(state.current_tab.next());
            KeyAction::None
        }
        KeyCode::BackTab => {
            state.switch_tab(state.current_tab.prev());
            KeyAction::None
        }
        KeyCode::Char('1') => {
            state.switch_tab(Tab::Summary);
            KeyAction::None
        }
        KeyCode::Char('2') => {
            state.switch_tab(Tab::Objects);
            KeyAction::None
        }
        KeyCode::Char('3') => {
            state.switch_tab(Tab::Garbage);
            KeyAction::None
        }

        // Row / popup navigation
        KeyCode::Up | KeyCode::Char('k') => {
            if state.show_help {
                state.help_scroll = state.help_scroll.saturating_sub(1);
            } else if state.detail_open() {
                state.child_selected = state.child_selected.saturating_sub(1);
            } else if state.current_tab == Tab::Summary {
                state.summary_scroll = state.summary_scroll.saturating_sub(1);
            } else if let Some(table) = state.active_table_mut() {
                table.select_up();
            }
            KeyAction::None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.show_help {
                state.help_scroll = state.help_scroll.saturating_add(1);
            } else if state.detail_open() {
                // Clamped during render against the children count
                state.child_selected = state.child_selected.saturating_add(1);
            } else if state.current_tab == Tab::Summary {
                state.summary_scroll = state.summary_scroll.saturating_add(1);
            } else if let Some(table) = state.active_table_mut() {
                table.select_down();
            }
            KeyAction::None
        }
        KeyCode::PageUp => {
            if state.detail_open() {
                state.detail_scroll = state.detail_scroll.saturating_sub(10);
            } else if let Some(table) = state.active_table_mut() {
                table.page_up(20);
            }
            KeyAction::None
        }
        KeyCode::PageDown => {
            if state.detail_open() {
                state.detail_scroll = state.detail_scroll.saturating_add(10);
            } else if let Some(table) = state.active_table_mut() {
                table.page_down(20);
            }
            KeyAction::None
        }

        // Open detail / drill into child
        KeyCode::Enter => {
            if state.show_help {
                state.show_help = false;
            } else if state.detail_open() {
                state.drill_down_requested = true;
            } else if let Some(address) = state
                .active_table()
                .and_then(|t| t.selected_item())
                .map(|row| row.address)
            {
                state.push_detail(address);
            }
            KeyAction::None
        }
        KeyCode::Backspace if state.detail_open() => {
            state.pop_detail();
            KeyAction::None
        }
        KeyCode::Esc => {
            if state.show_help {
                state.show_help = false;
            } else if state.detail_open() {
                state.close_detail();
            } else if state
                .active_table()
                .is_some_and(|table| table.filter.is_some())
            {
                if let Some(table) = state.active_table_mut() {
                    table.set_filter(None);
                }
                state.filter_input.clear();
            }
            state.status_message = None;
            KeyAction::None
        }

        // Sorting
        KeyCode::Char('s') => {
            if let Some(table) = state.active_table_mut() {
                table.next_sort_column();
            }
            KeyAction::None
        }
        KeyCode::Char('d') => {
            if let Some(table) = state.active_table_mut() {
                table.toggle_sort_direction();
            }
            KeyAction::None
        }

        // Filter mode
        KeyCode::Char('/') if !state.detail_open() && state.active_table().is_some() => {
            state.input_mode = InputMode::Filter;
            state.filter_input = state
                .active_table()
                .and_then(|t| t.filter.clone())
                .unwrap_or_default();
            KeyAction::None
        }

        // Goto-address prompt
        KeyCode::Char('g') => {
            state.input_mode = InputMode::Goto;
            state.goto_input.clear();
            state.goto_error = None;
            KeyAction::None
        }

        // Help
        KeyCode::Char('h') | KeyCode::Char('?') | KeyCode::F(1) => {
            state.show_help = !state.show_help;
            state.help_scroll = 0;
            KeyAction::None
        }

        _ => KeyAction::None,
    }
}

/// Handles keys while typing a filter.
fn handle_filter_mode(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc => {
            state.input_mode = InputMode::Normal;
            state.filter_input.clear();
            if let Some(table) = state.active_table_mut() {
                table.set_filter(None);
            }
        }
        KeyCode::Enter => {
            state.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            state.filter_input.pop();
            apply_filter(state);
        }
        KeyCode::Char(c) => {
            state.filter_input.push(c);
            apply_filter(state);
        }
        _ => {}
    }
    KeyAction::None
}

fn apply_filter(state: &mut AppState) {
    let filter = if state.filter_input.is_empty() {
        None
    } else {
        Some(state.filter_input.clone())
    };
    if let Some(table) = state.active_table_mut() {
        table.set_filter(filter);
    }
}

/// Handles keys while typing a goto address.
fn handle_goto_mode(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc => {
            state.input_mode = InputMode::Normal;
            state.goto_input.clear();
            state.goto_error = None;
        }
        KeyCode::Enter => {
            state.goto_requested = true;
        }
        KeyCode::Backspace => {
            state.goto_input.pop();
            state.goto_error = None;
        }
        KeyCode::Char(c) => {
            state.goto_input.push(c);
            state.goto_error = None;
        }
        _ => {}
    }
    KeyAction::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::models::ObjectRow;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn row(address: u64) -> ObjectRow {
        ObjectRow {
            address,
            kind: "obj",
            size: 8,
            type_name: "main.T".to_string(),
            children: 0,
            reachable: true,
        }
    }

    #[test]
    fn test_quit_needs_confirmation() {
        let mut state = AppState::new();
        assert_eq!(handle_key(&mut state, key(KeyCode::Char('q'))), KeyAction::None);
        assert!(state.show_quit_confirm);
        assert_eq!(handle_key(&mut state, key(KeyCode::Enter)), KeyAction::Quit);
    }

    #[test]
    fn test_quit_confirm_cancel() {
        let mut state = AppState::new();
        handle_key(&mut state, key(KeyCode::Char('q')));
        assert_eq!(handle_key(&mut state, key(KeyCode::Esc)), KeyAction::None);
        assert!(!state.show_quit_confirm);
    }

    #[test]
    fn test_tab_switch_blocked_by_popup() {
        let mut state = AppState::new();
        state.switch_tab(Tab::Objects);
        state.push_detail(0x100);
        handle_key(&mut state, key(KeyCode::Tab));
        assert_eq!(state.current_tab, Tab::Objects);
        assert!(state.status_message.is_some());
    }

    #[test]
    fn test_enter_opens_detail_on_selected_row() {
        let mut state = AppState::new();
        state.switch_tab(Tab::Objects);
        state.object_table.set_items(vec![row(0x100), row(0x200)]);
        handle_key(&mut state, key(KeyCode::Enter));
        assert_eq!(state.current_detail(), Some(0x100));
    }

    #[test]
    fn test_backspace_pops_detail() {
        let mut state = AppState::new();
        state.switch_tab(Tab::Objects);
        state.push_detail(0x100);
        state.push_detail(0x200);
        handle_key(&mut state, key(KeyCode::Backspace));
        assert_eq!(state.current_detail(), Some(0x100));
        handle_key(&mut state, key(KeyCode::Esc));
        assert!(!state.detail_open());
    }

    #[test]
    fn test_filter_typing() {
        let mut state = AppState::new();
        state.switch_tab(Tab::Objects);
        state
            .object_table
            .set_items(vec![row(0x100), row(0x200)]);
        handle_key(&mut state, key(KeyCode::Char('/')));
        assert_eq!(state.input_mode, InputMode::Filter);
        handle_key(&mut state, key(KeyCode::Char('m')));
        assert_eq!(state.object_table.filter.as_deref(), Some("m"));
        handle_key(&mut state, key(KeyCode::Enter));
        assert_eq!(state.input_mode, InputMode::Normal);
        assert_eq!(state.object_table.filter.as_deref(), Some("m"));
    }

    #[test]
    fn test_goto_mode_requests_lookup() {
        let mut state = AppState::new();
        handle_key(&mut state, key(KeyCode::Char('g')));
        assert_eq!(state.input_mode, InputMode::Goto);
        handle_key(&mut state, key(KeyCode::Char('0')));
        handle_key(&mut state, key(KeyCode::Char('x')));
        handle_key(&mut state, key(KeyCode::Char('1')));
        handle_key(&mut state, key(KeyCode::Enter));
        assert!(state.goto_requested);
        assert_eq!(state.goto_input, "0x1");
    }
}
