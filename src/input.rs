use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::categories::ALL;
use crate::controller::{Event, Move, RenderController};
use crate::models::{AddSource, Control};
use crate::ui::View;
use crate::utils::contains;

/// Maps a key press to a controller event, given what is currently on screen.
pub fn handle_key(key: KeyEvent, controller: &RenderController) -> Option<Event> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Event::Quit);
    }

    if let Some(id) = controller.detail_id() {
        return match key.code {
            KeyCode::Esc | KeyCode::Backspace => Some(Event::DetailsDismissed),
            KeyCode::Char('a') => Some(Event::AddToCart { product_id: id, source: AddSource::Detail }),
            KeyCode::Up | KeyCode::Char('k') => Some(Event::ScrollDetail(-1)),
            KeyCode::Down | KeyCode::Char('j') => Some(Event::ScrollDetail(1)),
            KeyCode::Char('q') => Some(Event::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Left | KeyCode::Char('h') => Some(Event::MoveCursor(Move::Left)),
        KeyCode::Right | KeyCode::Char('l') => Some(Event::MoveCursor(Move::Right)),
        KeyCode::Up | KeyCode::Char('k') => Some(Event::MoveCursor(Move::Up)),
        KeyCode::Down | KeyCode::Char('j') => Some(Event::MoveCursor(Move::Down)),
        KeyCode::Tab => Some(Event::NextCategory),
        KeyCode::BackTab => Some(Event::PreviousCategory),
        KeyCode::Char('0') => Some(Event::CategorySelected(ALL.to_string())),
        KeyCode::Char(c @ '1'..='9') => {
            let n = c.to_digit(10)? as usize;
            controller
                .categories()
                .categories()
                .get(n - 1)
                .map(|category| Event::CategorySelected(category.clone()))
        }
        KeyCode::Enter | KeyCode::Char(' ') => controller.focused_product_id().map(Event::DetailsRequested),
        KeyCode::Char('a') => controller
            .focused_product_id()
            .map(|id| Event::AddToCart { product_id: id, source: AddSource::Card }),
        KeyCode::Char('q') => Some(Event::Quit),
        _ => None,
    }
}

/// Delegated click handling: resolves the control under the pointer.
pub fn handle_mouse(mouse: MouseEvent, view: &View) -> Option<Event> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => match view.control_at(mouse.column, mouse.row) {
            Some(control) => Some(control_event(control)),
            // clicking the backdrop closes the overlay
            None => match view.overlay {
                Some(dialog) if !contains(dialog, mouse.column, mouse.row) => Some(Event::DetailsDismissed),
                _ => None,
            },
        },
        MouseEventKind::ScrollDown if view.overlay.is_some() => Some(Event::ScrollDetail(1)),
        MouseEventKind::ScrollUp if view.overlay.is_some() => Some(Event::ScrollDetail(-1)),
        MouseEventKind::ScrollDown => Some(Event::MoveCursor(Move::Down)),
        MouseEventKind::ScrollUp => Some(Event::MoveCursor(Move::Up)),
        _ => None,
    }
}

fn control_event(control: &Control) -> Event {
    match control {
        Control::Category(category) => Event::CategorySelected(category.clone()),
        Control::Details(id) => Event::DetailsRequested(*id),
        Control::AddToCart(id) => Event::AddToCart { product_id: *id, source: AddSource::Delegated },
        Control::ModalAddToCart(id) => Event::AddToCart { product_id: *id, source: AddSource::Detail },
        Control::CloseDetail => Event::DetailsDismissed,
    }
}
