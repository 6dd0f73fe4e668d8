//! Key bindings for walking around.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use parley_core::Direction;
use parley_dialogue::Input;

/// Cells moved per arrow press with Shift held.
pub const RUN_STEPS: u16 = 5;

/// Help text listing the bindings.
pub const KEY_HELP: &str = "\
Keys

  Arrows        walk (hold Shift to run)
  Enter         talk to whoever is next to you
  1-9           pick a reply
  /             type your own reply, Enter to send, Esc to cancel
  t             show the conversation so far
  [ / ]         scroll this pane
  ? / h         show this help
  q / Ctrl+C    quit";

/// What a key press does outside of text entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Forward an input to the game.
    Game(Input),
    /// Start typing a free-text reply.
    StartTyping,
    /// Scroll the dialogue pane up.
    ScrollUp,
    /// Scroll the dialogue pane down.
    ScrollDown,
}

/// Map a key press to an action, or `None` if the key is unbound.
pub fn map_key(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return (key.code == KeyCode::Char('c')).then_some(Action::Game(Input::Quit));
    }

    let steps = if key.modifiers.contains(KeyModifiers::SHIFT) {
        RUN_STEPS
    } else {
        1
    };
    let walk = |direction| Some(Action::Game(Input::Move { direction, steps }));

    match key.code {
        KeyCode::Up => walk(Direction::Up),
        KeyCode::Down => walk(Direction::Down),
        KeyCode::Left => walk(Direction::Left),
        KeyCode::Right => walk(Direction::Right),
        KeyCode::Enter => Some(Action::Game(Input::Confirm)),
        KeyCode::Char(c @ '1'..='9') => c
            .to_digit(10)
            .and_then(|d| u8::try_from(d).ok())
            .map(|d| Action::Game(Input::Digit(d))),
        KeyCode::Char('/') => Some(Action::StartTyping),
        KeyCode::Char('t') => Some(Action::Game(Input::ShowTranscript)),
        KeyCode::Char('?' | 'h') => Some(Action::Game(Input::Help)),
        KeyCode::Char('q') => Some(Action::Game(Input::Quit)),
        KeyCode::Char('[') => Some(Action::ScrollUp),
        KeyCode::Char(']') => Some(Action::ScrollDown),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_walk_one_cell() {
        assert_eq!(
            map_key(press(KeyCode::Left)),
            Some(Action::Game(Input::Move {
                direction: Direction::Left,
                steps: 1
            }))
        );
    }

    #[test]
    fn shift_arrows_run() {
        let key = KeyEvent::new(KeyCode::Down, KeyModifiers::SHIFT);
        assert_eq!(
            map_key(key),
            Some(Action::Game(Input::Move {
                direction: Direction::Down,
                steps: RUN_STEPS
            }))
        );
    }

    #[test]
    fn digits_pick_options() {
        assert_eq!(
            map_key(press(KeyCode::Char('3'))),
            Some(Action::Game(Input::Digit(3)))
        );
        assert_eq!(map_key(press(KeyCode::Char('0'))), None);
    }

    #[test]
    fn talking_and_typing() {
        assert_eq!(
            map_key(press(KeyCode::Enter)),
            Some(Action::Game(Input::Confirm))
        );
        assert_eq!(map_key(press(KeyCode::Char('/'))), Some(Action::StartTyping));
        assert_eq!(
            map_key(press(KeyCode::Char('t'))),
            Some(Action::Game(Input::ShowTranscript))
        );
    }

    #[test]
    fn quitting() {
        assert_eq!(
            map_key(press(KeyCode::Char('q'))),
            Some(Action::Game(Input::Quit))
        );
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_c), Some(Action::Game(Input::Quit)));
        let ctrl_x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_x), None);
    }
}
