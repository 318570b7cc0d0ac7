//! Input handling - maps crossterm key events to grid keys.

use crossterm::event::{
  KeyCode,
  KeyEvent,
  KeyEventKind,
  KeyModifiers,
};
use level_lib::grid::GridKey;

pub fn to_grid_key(event: KeyEvent) -> Option<GridKey> {
  if event.kind == KeyEventKind::Release {
    return None;
  }
  if event.modifiers.contains(KeyModifiers::CONTROL) {
    return match event.code {
      KeyCode::Char('c') => Some(GridKey::Escape),
      _ => None,
    };
  }

  match event.code {
    KeyCode::Char(c) => Some(GridKey::Char(c)),
    KeyCode::Enter => Some(GridKey::Enter),
    KeyCode::Esc => Some(GridKey::Escape),
    KeyCode::Backspace => Some(GridKey::Backspace),
    KeyCode::Home => Some(GridKey::Home),
    KeyCode::End => Some(GridKey::End),
    KeyCode::PageUp => Some(GridKey::PageUp),
    KeyCode::PageDown => Some(GridKey::PageDown),
    KeyCode::Left => Some(GridKey::Left),
    KeyCode::Right => Some(GridKey::Right),
    KeyCode::Up => Some(GridKey::Up),
    KeyCode::Down => Some(GridKey::Down),
    KeyCode::Tab => Some(GridKey::Right),
    KeyCode::BackTab => Some(GridKey::Left),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn maps_navigation_and_text() {
    let key = |code| to_grid_key(KeyEvent::new(code, KeyModifiers::NONE));
    assert_eq!(key(KeyCode::Up), Some(GridKey::Up));
    assert_eq!(key(KeyCode::Enter), Some(GridKey::Enter));
    assert_eq!(key(KeyCode::Char('s')), Some(GridKey::Char('s')));
    assert_eq!(key(KeyCode::F(5)), None);
  }

  #[test]
  fn control_chords_are_not_text() {
    let ctrl = |c| to_grid_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    assert_eq!(ctrl('c'), Some(GridKey::Escape));
    assert_eq!(ctrl('s'), None);
  }
}
