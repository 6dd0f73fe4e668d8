//! The dialogue pane: the one block of text the engine shows at a time.

use parley_dialogue::DisplaySink;

/// Holds the most recently shown text and a scroll offset.
#[derive(Debug, Clone, Default)]
pub struct TextPane {
    text: String,
    scroll: u16,
    updates: u64,
}

impl TextPane {
    /// Create a pane showing `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// The text currently shown.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Lines scrolled off the top.
    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    /// How many times the text was replaced.
    pub fn updates(&self) -> u64 {
        self.updates
    }

    /// Scroll towards the start of the text.
    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    /// Scroll towards the end of the text, stopping at the last line.
    pub fn scroll_down(&mut self) {
        let last = u16::try_from(self.text.lines().count().saturating_sub(1)).unwrap_or(u16::MAX);
        self.scroll = self.scroll.saturating_add(1).min(last);
    }
}

impl DisplaySink for TextPane {
    fn show(&mut self, text: &str) {
        self.text = text.to_string();
        self.scroll = 0;
        self.updates += 1;
    }
}
