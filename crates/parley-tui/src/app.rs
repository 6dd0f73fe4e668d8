//! Top-level application state: the game controller plus the reply line.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use parley_dialogue::{Flow, Input, InteractionController};

use crate::keys::{self, Action};
use crate::pane::TextPane;

/// How key presses are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Keys walk, talk, and pick replies.
    Explore,
    /// Keys edit a free-text reply.
    Typing,
}

/// Main application state for the terminal UI.
pub struct TuiApp {
    /// The game.
    pub controller: InteractionController<TextPane>,
    /// Current key interpretation.
    pub mode: InputMode,
    /// Whether the app should quit.
    pub should_quit: bool,
    input_text: String,
    input_cursor: usize,
}

impl TuiApp {
    /// Wrap a controller.
    pub fn new(controller: InteractionController<TextPane>) -> Self {
        Self {
            controller,
            mode: InputMode::Explore,
            should_quit: false,
            input_text: String::new(),
            input_cursor: 0,
        }
    }

    /// The reply being typed.
    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    /// Byte offset of the cursor in the reply being typed.
    pub fn input_cursor(&self) -> usize {
        self.input_cursor
    }

    /// Apply finished generation requests. Returns how many were applied.
    pub fn tick(&mut self) -> usize {
        self.controller.poll_completions()
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.send(Input::Quit);
            return;
        }

        match self.mode {
            InputMode::Explore => match keys::map_key(key) {
                Some(Action::Game(input)) => self.send(input),
                Some(Action::StartTyping) => self.mode = InputMode::Typing,
                Some(Action::ScrollUp) => self.controller.display_mut().scroll_up(),
                Some(Action::ScrollDown) => self.controller.display_mut().scroll_down(),
                None => {}
            },
            InputMode::Typing => self.edit_reply(key),
        }
    }

    fn send(&mut self, input: Input) {
        if self.controller.handle(input) == Flow::Quit {
            self.should_quit = true;
        }
    }

    fn edit_reply(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let text = std::mem::take(&mut self.input_text);
                self.input_cursor = 0;
                self.mode = InputMode::Explore;
                self.send(Input::Reply(text));
            }
            KeyCode::Esc => {
                self.input_text.clear();
                self.input_cursor = 0;
                self.mode = InputMode::Explore;
            }
            KeyCode::Backspace => {
                if let Some(prev) = self.prev_boundary() {
                    self.input_text.remove(prev);
                    self.input_cursor = prev;
                }
            }
            KeyCode::Left => {
                if let Some(prev) = self.prev_boundary() {
                    self.input_cursor = prev;
                }
            }
            KeyCode::Right => {
                if let Some(c) = self.input_text[self.input_cursor..].chars().next() {
                    self.input_cursor += c.len_utf8();
                }
            }
            KeyCode::Home => self.input_cursor = 0,
            KeyCode::End => self.input_cursor = self.input_text.len(),
            KeyCode::Char(c) => {
                self.input_text.insert(self.input_cursor, c);
                self.input_cursor += c.len_utf8();
            }
            _ => {}
        }
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.input_text[..self.input_cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
    }
}
