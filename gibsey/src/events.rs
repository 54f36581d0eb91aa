//! Event handling for the reader TUI

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use gibsey_core::ScrollDirection;

use crate::app::{App, InputMode};

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
}

/// Handle a terminal event
pub fn handle_event(app: &mut App, event: Event) -> EventResult {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

fn handle_mouse_event(app: &mut App, mouse: MouseEvent) -> EventResult {
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            app.scroll(ScrollDirection::Up);
            EventResult::NeedsRedraw
        }
        MouseEventKind::ScrollDown => {
            app.scroll(ScrollDirection::Down);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    if key.kind != KeyEventKind::Press {
        return EventResult::Continue;
    }

    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return EventResult::Quit;
    }

    if app.has_overlay() {
        return handle_overlay_key(app, key);
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Insert => handle_insert_mode(app, key),
    }
}

/// Handle keys in NORMAL mode (navigation and hotkeys)
fn handle_normal_mode(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('q') => EventResult::Quit,

        KeyCode::Char('i') => {
            app.enter_insert_mode();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('?') | KeyCode::F(1) => {
            app.toggle_help();
            EventResult::NeedsRedraw
        }

        // Focus and list navigation
        KeyCode::Tab => {
            app.cycle_focus();
            EventResult::NeedsRedraw
        }
        KeyCode::BackTab => {
            app.cycle_focus_reverse();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_cursor(true);
            EventResult::NeedsRedraw
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_cursor(false);
            EventResult::NeedsRedraw
        }
        KeyCode::Enter => {
            app.activate();
            EventResult::NeedsRedraw
        }
        KeyCode::PageDown => {
            app.scroll(ScrollDirection::Down);
            EventResult::NeedsRedraw
        }
        KeyCode::PageUp => {
            app.scroll(ScrollDirection::Up);
            EventResult::NeedsRedraw
        }

        // Reading
        KeyCode::Char('n') | KeyCode::Right => {
            app.next_page();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('p') | KeyCode::Left => {
            app.previous_page();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('v') => {
            app.toggle_vault_page();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('x') => {
            app.clear_character();
            EventResult::NeedsRedraw
        }

        _ => EventResult::Continue,
    }
}

/// Handle keys in INSERT mode (query input)
fn handle_insert_mode(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc => {
            app.enter_normal_mode();
            EventResult::NeedsRedraw
        }
        KeyCode::Enter => {
            app.submit_query();
            EventResult::NeedsRedraw
        }

        KeyCode::Left => {
            app.draft.left();
            EventResult::NeedsRedraw
        }
        KeyCode::Right => {
            app.draft.right();
            EventResult::NeedsRedraw
        }
        KeyCode::Home => {
            app.draft.home();
            EventResult::NeedsRedraw
        }
        KeyCode::End => {
            app.draft.end();
            EventResult::NeedsRedraw
        }
        KeyCode::Backspace => {
            app.draft.erase_back();
            EventResult::NeedsRedraw
        }
        KeyCode::Delete => {
            app.draft.erase_forward();
            EventResult::NeedsRedraw
        }
        KeyCode::Up => {
            app.draft.recall_older();
            EventResult::NeedsRedraw
        }
        KeyCode::Down => {
            app.draft.recall_newer();
            EventResult::NeedsRedraw
        }

        KeyCode::Char(c) => {
            app.draft.insert(c);
            EventResult::NeedsRedraw
        }

        _ => EventResult::Continue,
    }
}

fn handle_overlay_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Enter => {
            app.close_overlay();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gibsey_core::testing::fixture_controller;
    use gibsey_core::CharacterId;

    use crate::ui::FocusedPanel;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn app() -> App {
        let (controller, _ticker) = fixture_controller();
        App::new(controller)
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert_eq!(handle_event(&mut app, key(KeyCode::Char('q'))), EventResult::Quit);

        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        app.enter_insert_mode();
        assert_eq!(handle_event(&mut app, ctrl_c), EventResult::Quit);
    }

    #[test]
    fn test_typing_q_in_insert_mode_does_not_quit() {
        let mut app = app();
        handle_event(&mut app, key(KeyCode::Char('i')));
        assert_eq!(
            handle_event(&mut app, key(KeyCode::Char('q'))),
            EventResult::NeedsRedraw
        );
        assert_eq!(app.draft.text(), "q");

        handle_event(&mut app, key(KeyCode::Esc));
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_tab_then_enter_selects_character() {
        let mut app = app();
        handle_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.focused_panel, FocusedPanel::Characters);

        handle_event(&mut app, key(KeyCode::Char('j')));
        handle_event(&mut app, key(KeyCode::Char('j')));
        handle_event(&mut app, key(KeyCode::Enter));

        assert_eq!(
            app.view().selection.character.map(|c| c.id),
            Some(CharacterId(2))
        );
    }

    #[test]
    fn test_insert_submit_records_query() {
        let mut app = app();
        app.select_character(CharacterId(3));

        handle_event(&mut app, key(KeyCode::Char('i')));
        for c in "order?".chars() {
            handle_event(&mut app, key(KeyCode::Char(c)));
        }
        handle_event(&mut app, key(KeyCode::Enter));

        assert_eq!(app.view().queries, vec!["order?"]);
        assert_eq!(app.input_mode, InputMode::Insert);

        handle_event(&mut app, key(KeyCode::Up));
        assert_eq!(app.draft.text(), "order?");
    }

    #[test]
    fn test_help_overlay_swallows_keys() {
        let mut app = app();
        handle_event(&mut app, key(KeyCode::Char('?')));
        assert!(app.has_overlay());

        assert_eq!(handle_event(&mut app, key(KeyCode::Char('n'))), EventResult::Continue);
        assert_eq!(app.view().selection.page, None);

        handle_event(&mut app, key(KeyCode::Esc));
        assert!(!app.has_overlay());
    }

    #[test]
    fn test_key_release_ignored() {
        let mut app = app();
        let mut release = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(handle_event(&mut app, Event::Key(release)), EventResult::Continue);
        assert_eq!(app.view().selection.page, None);
    }
}
