use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use gnotes::session::Input;

/// Maps a terminal key press to a session input. Control and Alt chords are
/// not bound to anything.
pub fn to_input(key: KeyEvent) -> Option<Input> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    let input = match key.code {
        KeyCode::Char(c) => Input::Char(c),
        KeyCode::Enter => Input::Enter,
        KeyCode::Esc => Input::Esc,
        KeyCode::Backspace => Input::Backspace,
        KeyCode::Up => Input::Up,
        KeyCode::Down => Input::Down,
        KeyCode::Home => Input::Home,
        KeyCode::End => Input::End,
        _ => return None,
    };
    Some(input)
}
