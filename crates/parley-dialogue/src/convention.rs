//! The textual contract between prompts and the reply parser.
//!
//! Prompts tell the model to introduce replies with a marker line and to
//! label each reply `[n]`. The parser looks for the same marker and labels.
//! Bare `n.` / `n)` labels are also recognized because models drift towards
//! ordinary numbered lists.

use crate::config::MAX_OPTIONS;

/// Marker line separating the entity's words from the player's options.
pub const DEFAULT_MARKER: &str = "Possible responses:";

/// How replies are introduced and labeled in generated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Convention {
    /// Text that introduces the option block.
    pub marker: String,
    /// Highest label accepted by the parser.
    pub max_label: u8,
}

impl Default for Convention {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            max_label: MAX_OPTIONS,
        }
    }
}

impl Convention {
    /// Use a different marker.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// The label as prompts ask for it, e.g. `[2]`.
    pub fn label(&self, n: u8) -> String {
        format!("[{n}]")
    }

    /// The instruction describing this convention to the model, with
    /// example labels for `option_count` replies.
    pub fn instructions(&self, option_count: u8) -> String {
        let labels = (1..=option_count.min(self.max_label).max(1))
            .map(|n| self.label(n))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "When asked for ways the player can respond, first write a line containing exactly \
             \"{marker}\". Then write each response on its own line, starting with its number in \
             square brackets: {labels}. Do not number anything else.",
            marker = self.marker,
        )
    }

    /// Byte offset of the marker in `text`, ignoring ASCII case.
    pub fn find_marker(&self, text: &str) -> Option<usize> {
        if self.marker.is_empty() {
            return None;
        }
        text.to_ascii_lowercase()
            .find(&self.marker.to_ascii_lowercase())
    }
}

/// Split a line that starts with a label into `(digits, rest)`.
///
/// Recognizes `[12] text`, `12. text`, and `12) text` after leading
/// whitespace. Dotted labels need whitespace or end of line after the
/// delimiter so that `1.5 miles` is left alone.
pub fn split_label(line: &str) -> Option<(&str, &str)> {
    let line = line.trim_start();

    if let Some(inner) = line.strip_prefix('[') {
        let close = inner.find(']')?;
        let digits = &inner[..close];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        return Some((digits, &inner[close + 1..]));
    }

    let end = line
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(line.len());
    if end == 0 {
        return None;
    }
    let (digits, rest) = line.split_at(end);
    let rest = rest
        .strip_prefix('.')
        .or_else(|| rest.strip_prefix(')'))?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some((digits, rest))
    } else {
        None
    }
}
