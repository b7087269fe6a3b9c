use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::state::{AppState, Focus, UiEvent};

/// Translates a key press into a UI event for the current state.
pub fn map_key(state: &AppState, key: KeyEvent) -> Option<UiEvent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }
    if state.help_overlay {
        return match key.code {
            KeyCode::Char('?') | KeyCode::Esc => Some(UiEvent::ToggleHelp),
            _ => None,
        };
    }
    if state.history_dialog.is_some() {
        return match key.code {
            KeyCode::Char('k') | KeyCode::Up => Some(UiEvent::HistoryUp),
            KeyCode::Char('j') | KeyCode::Down => Some(UiEvent::HistoryDown),
            KeyCode::Enter => Some(UiEvent::HistoryCommit),
            KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('q') => Some(UiEvent::CloseHistory),
            _ => None,
        };
    }
    match state.focus {
        Focus::Search => map_search_key(state, key),
        Focus::Recommendations => map_browse_key(state, key),
    }
}

fn map_search_key(state: &AppState, key: KeyEvent) -> Option<UiEvent> {
    let overlay = state.suggestions().is_visible();
    if key.modifiers.contains(KeyModifiers::ALT) {
        return match key.code {
            KeyCode::Left => Some(UiEvent::NavigateBack),
            KeyCode::Right => Some(UiEvent::NavigateForward),
            KeyCode::Char('h') => Some(UiEvent::OpenHistory),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Down if overlay => Some(UiEvent::SuggestionDown),
        KeyCode::Up if overlay => Some(UiEvent::SuggestionUp),
        KeyCode::Enter if overlay => Some(UiEvent::SuggestionCommit),
        KeyCode::Esc if overlay => Some(UiEvent::DismissSuggestions),
        KeyCode::Esc | KeyCode::Tab => Some(UiEvent::FocusNext),
        KeyCode::Backspace => {
            let mut text = state.query.clone();
            text.pop()?;
            Some(UiEvent::TextChanged(text))
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let mut text = state.query.clone();
            text.push(c);
            Some(UiEvent::TextChanged(text))
        }
        _ => None,
    }
}

fn map_browse_key(state: &AppState, key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('/') | KeyCode::Char('s') => Some(UiEvent::FocusSearch),
        KeyCode::Tab => Some(UiEvent::FocusNext),
        KeyCode::Char('b') | KeyCode::Left => Some(UiEvent::NavigateBack),
        KeyCode::Char('f') | KeyCode::Right => Some(UiEvent::NavigateForward),
        KeyCode::Char('h') => Some(UiEvent::OpenHistory),
        KeyCode::Char('j') | KeyCode::Down => Some(UiEvent::RecommendationDown),
        KeyCode::Char('k') | KeyCode::Up => Some(UiEvent::RecommendationUp),
        KeyCode::Enter => Some(UiEvent::RecommendationSelected(state.rec_selected)),
        KeyCode::Char('p') => Some(UiEvent::CyclePosition),
        KeyCode::Char('g') => Some(UiEvent::CycleLeague),
        KeyCode::Char('[') => Some(UiEvent::AgeMinDown),
        KeyCode::Char(']') => Some(UiEvent::AgeMinUp),
        KeyCode::Char('{') => Some(UiEvent::AgeMaxDown),
        KeyCode::Char('}') => Some(UiEvent::AgeMaxUp),
        KeyCode::Char('a') => Some(UiEvent::ApplyFilters),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        _ => None,
    }
}

pub fn map_mouse(mouse: MouseEvent) -> Option<UiEvent> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(UiEvent::Click {
            column: mouse.column,
            row: mouse.row,
        }),
        _ => None,
    }
}
