//! Labeled reply options offered to the player.

/// One reply the player can choose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueOption {
    /// The number the player presses.
    pub label: u8,
    /// What the player says when choosing it.
    pub text: String,
}

/// An ordered set of options with unique labels.
///
/// Only the parser builds option sets; a session swaps in a whole new set
/// after each successful generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet {
    options: Vec<DialogueOption>,
}

impl OptionSet {
    pub(crate) fn new(options: Vec<DialogueOption>) -> Self {
        Self { options }
    }

    /// Text of the option with the given label.
    pub fn get(&self, label: u8) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.label == label)
            .map(|o| o.text.as_str())
    }

    /// Iterate in generation order.
    pub fn iter(&self) -> impl Iterator<Item = &DialogueOption> {
        self.options.iter()
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// `true` if there is nothing to choose from.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// One `[n] text` line per option.
    pub fn render(&self) -> String {
        self.options
            .iter()
            .map(|o| format!("[{}] {}", o.label, o.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
