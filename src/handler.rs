use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};
use tokio::sync::mpsc;

use crate::app::App;
use crate::bookmarks::sort::SortCriterion;
use crate::event::{spawn_file_load, Event};

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent, tx: &mpsc::UnboundedSender<Event>) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),
        KeyCode::Enter | KeyCode::Char(' ') => app.toggle_selected(),
        KeyCode::Char('l') | KeyCode::Right => app.expand_selected(),
        KeyCode::Char('h') | KeyCode::Left => app.collapse_selected(),

        KeyCode::Char('t') => app.resort_selected(SortCriterion::ByText),
        KeyCode::Char('d') => app.resort_selected(SortCriterion::ByDate),
        KeyCode::Char('u') => app.resort_selected(SortCriterion::ByUrl),
        KeyCode::Char('o') => app.resort_selected(SortCriterion::Original),

        KeyCode::Char('r') => reload(app, tx),
        KeyCode::Char('e') => app.export(),
        _ => {}
    }
}

/// Re-read the current file in the background. Ignored while a read is
/// already in flight.
pub fn reload(app: &mut App, tx: &mpsc::UnboundedSender<Event>) {
    if app.loading {
        return;
    }
    app.loading = true;
    app.set_status_message(format!("Loading {}…", app.source.display()));
    spawn_file_load(app.source.clone(), tx.clone());
}

/// Handle a mouse event: the wheel moves the selection.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => app.select_next(),
        MouseEventKind::ScrollUp => app.select_previous(),
        _ => {}
    }
}
