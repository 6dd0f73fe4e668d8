//! Splitting generated text into an utterance and reply options.
//!
//! Models do not always follow the requested format, so every path through
//! the parser returns a usable result. Format drift is reported as a
//! [`Degradation`] alongside the result, never as an error.

use std::collections::HashSet;

use crate::convention::{Convention, split_label};
use crate::options::{DialogueOption, OptionSet};

/// How a reply deviated from the requested format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degradation {
    /// The text was empty.
    Empty,
    /// No marker line; the first line was taken as the utterance.
    MarkerMissing,
    /// The marker was present but no option could be parsed after it.
    NoOptions,
}

/// The result of parsing one generated reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    /// What the entity says.
    pub utterance: String,
    /// Replies the player can pick, in generation order.
    pub options: OptionSet,
    /// Set when the reply did not follow the format.
    pub degradation: Option<Degradation>,
}

impl ParsedResponse {
    /// `true` when there is neither an utterance nor options.
    pub fn is_empty(&self) -> bool {
        self.utterance.is_empty() && self.options.is_empty()
    }
}

/// Turns raw generated text into a [`ParsedResponse`].
pub trait ResponseParser: Send + Sync {
    /// Parse raw generated text. Must not fail and must not keep state.
    fn parse(&self, raw: &str) -> ParsedResponse;
}

/// The default parser: marker line first, first-line fallback second.
#[derive(Debug, Clone, Default)]
pub struct MarkerParser {
    convention: Convention,
}

impl MarkerParser {
    /// Create a parser for the given convention.
    pub fn new(convention: Convention) -> Self {
        Self { convention }
    }

    /// Split an option block into labeled options.
    ///
    /// A record starts at a labeled line and runs until the next labeled
    /// line. Lines before the first label are ignored. A record without any
    /// text is not something the player can say and is dropped.
    fn parse_options(&self, block: &str) -> OptionSet {
        let mut records: Vec<(&str, Vec<&str>)> = Vec::new();
        for line in block.lines() {
            match split_label(line) {
                Some((digits, rest)) => records.push((digits, vec![rest])),
                None => {
                    if let Some((_, lines)) = records.last_mut() {
                        lines.push(line);
                    }
                }
            }
        }

        let mut seen = HashSet::new();
        let mut options = Vec::new();
        for (digits, lines) in records {
            let label = match digits.parse::<u8>() {
                Ok(n) if (1..=self.convention.max_label).contains(&n) => n,
                _ => {
                    tracing::warn!(label = digits, "dropping reply option with unusable label");
                    continue;
                }
            };
            if !seen.insert(label) {
                tracing::warn!(label, "dropping repeated reply option label");
                continue;
            }

            let text = join_record(&lines);
            if text.is_empty() {
                tracing::warn!(label, "dropping empty reply option");
                continue;
            }
            options.push(DialogueOption { label, text });
        }

        OptionSet::new(options)
    }
}

impl ResponseParser for MarkerParser {
    fn parse(&self, raw: &str) -> ParsedResponse {
        let text = normalize(raw);
        if text.is_empty() {
            return ParsedResponse {
                utterance: String::new(),
                options: OptionSet::default(),
                degradation: Some(Degradation::Empty),
            };
        }

        let (utterance, block, marker_found) = match self.convention.find_marker(&text) {
            Some(at) => (
                text[..at].trim(),
                &text[at + self.convention.marker.len()..],
                true,
            ),
            None => {
                // `text` is trimmed, so its first line is not blank.
                let (first, rest) = text.split_once('\n').unwrap_or((text.as_str(), ""));
                (first.trim(), rest, false)
            }
        };

        let options = self.parse_options(block);
        let degradation = if !marker_found {
            Some(Degradation::MarkerMissing)
        } else if options.is_empty() {
            Some(Degradation::NoOptions)
        } else {
            None
        };
        if let Some(kind) = degradation {
            tracing::debug!(
                ?kind,
                options = options.len(),
                "reply did not follow the option format"
            );
        }

        ParsedResponse {
            utterance: utterance.to_string(),
            options,
            degradation,
        }
    }
}

/// Unify line breaks and trim the whole text.
fn normalize(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace('\r', "\n").trim().to_string()
}

/// Join the lines of one option record and drop wrapping quotes.
fn join_record(lines: &[&str]) -> String {
    let joined = lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    strip_quotes(&joined).to_string()
}

fn strip_quotes(text: &str) -> &str {
    for (open, close) in [('"', '"'), ('\u{201c}', '\u{201d}')] {
        if let Some(inner) = text
            .strip_prefix(open)
            .and_then(|t| t.strip_suffix(close))
        {
            return inner.trim();
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parse(raw: &str) -> ParsedResponse {
        MarkerParser::default().parse(raw)
    }

    fn pairs(parsed: &ParsedResponse) -> Vec<(u8, &str)> {
        parsed
            .options
            .iter()
            .map(|o| (o.label, o.text.as_str()))
            .collect()
    }

    #[test]
    fn marker_free_numbered_list() {
        let parsed = parse("Hello there.\n1. Ask about the stick\n2. Apologize\n3. Walk away");
        assert_eq!(parsed.utterance, "Hello there.");
        assert_eq!(
            pairs(&parsed),
            vec![(1, "Ask about the stick"), (2, "Apologize"), (3, "Walk away")]
        );
        assert_eq!(parsed.degradation, Some(Degradation::MarkerMissing));
    }

    #[test]
    fn marker_with_bracket_labels() {
        let raw = "Woof! You took my stick, human!\nGive it back.\n\n\
                   Possible responses:\n[1] \"I didn't take it.\"\n[2] Offer a treat\n[3] Run";
        let parsed = parse(raw);
        assert_eq!(parsed.utterance, "Woof! You took my stick, human!\nGive it back.");
        assert_eq!(
            pairs(&parsed),
            vec![(1, "I didn't take it."), (2, "Offer a treat"), (3, "Run")]
        );
        assert!(parsed.degradation.is_none());
    }

    #[test]
    fn marker_is_found_mid_line() {
        let parsed = parse("Well hello. Possible responses: [1] Hi\n[2] Bye");
        assert_eq!(parsed.utterance, "Well hello.");
        assert_eq!(pairs(&parsed), vec![(1, "Hi"), (2, "Bye")]);
    }

    #[test]
    fn multiline_records_are_joined() {
        let parsed = parse("Hm.\nPossible responses:\n[1] Tell him\n   about Jello\n[2] Leave");
        assert_eq!(pairs(&parsed), vec![(1, "Tell him about Jello"), (2, "Leave")]);
    }

    #[test]
    fn windows_line_breaks() {
        let parsed = parse("Hi.\r\nPossible responses:\r\n[1] Hello\r\n[2] Bye\r\n");
        assert_eq!(parsed.utterance, "Hi.");
        assert_eq!(pairs(&parsed), vec![(1, "Hello"), (2, "Bye")]);
    }

    #[test]
    fn repeated_label_keeps_first() {
        let parsed = parse("Hi.\nPossible responses:\n[1] First\n[1] Second\n[2] Third");
        assert_eq!(pairs(&parsed), vec![(1, "First"), (2, "Third")]);
    }

    #[test]
    fn out_of_range_labels_dropped() {
        let parsed = parse("Hi.\nPossible responses:\n[0] Zero\n[1] One\n[12] Twelve\n[999] Big");
        assert_eq!(pairs(&parsed), vec![(1, "One")]);
    }

    #[test]
    fn bare_label_is_not_an_option() {
        let parsed = parse("Hi.\nPossible responses:\n[1]\n[2] Foo\n[3] \"\"");
        assert_eq!(pairs(&parsed), vec![(2, "Foo")]);
        assert!(parsed.degradation.is_none());

        let parsed = parse("Hi.\nPossible responses:\n[1]\n   \n");
        assert!(parsed.options.is_empty());
        assert_eq!(parsed.degradation, Some(Degradation::NoOptions));
    }

    #[test]
    fn marker_without_options() {
        let parsed = parse("Go away.\nPossible responses:\nNone, really.");
        assert_eq!(parsed.utterance, "Go away.");
        assert!(parsed.options.is_empty());
        assert_eq!(parsed.degradation, Some(Degradation::NoOptions));
    }

    #[test]
    fn empty_text() {
        let parsed = parse("  \n\t ");
        assert!(parsed.is_empty());
        assert_eq!(parsed.degradation, Some(Degradation::Empty));
    }

    #[test]
    fn single_line_without_marker() {
        let parsed = parse("  Grrr.  ");
        assert_eq!(parsed.utterance, "Grrr.");
        assert!(parsed.options.is_empty());
    }

    #[test]
    fn custom_marker() {
        let parser = MarkerParser::new(Convention::default().with_marker("REPLIES"));
        let parsed = parser.parse("Yes?\nreplies\n[1] No");
        assert_eq!(parsed.utterance, "Yes?");
        assert_eq!(pairs(&parsed), vec![(1, "No")]);
    }

    #[test]
    fn prose_numbers_are_not_labels() {
        let parsed = parse("I walked 1.5 miles.\nPossible responses:\n[1] Wow\nIt took 2 hours.");
        assert_eq!(pairs(&parsed), vec![(1, "Wow It took 2 hours.")]);
    }

    proptest! {
        #[test]
        fn parse_never_panics_and_is_idempotent(raw in "\\PC{0,200}") {
            let parser = MarkerParser::default();
            let first = parser.parse(&raw);
            let second = parser.parse(&raw);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn marker_keeps_prefix_and_labels(
            prefix in "[a-zA-Z][a-zA-Z .,!?]{0,40}",
            texts in prop::collection::vec("[a-zA-Z][a-zA-Z ]{0,20}", 1..9),
        ) {
            let mut raw = format!("{prefix}\nPossible responses:\n");
            for (i, text) in texts.iter().enumerate() {
                raw.push_str(&format!("[{}] {}\n", i + 1, text));
            }
            let parsed = MarkerParser::default().parse(&raw);

            prop_assert!(!parsed.utterance.is_empty());
            prop_assert_eq!(parsed.utterance.as_str(), prefix.trim());
            let labels: Vec<u8> = parsed.options.iter().map(|o| o.label).collect();
            let expected: Vec<u8> = (1..=texts.len() as u8).collect();
            prop_assert_eq!(labels, expected);
            for (option, text) in parsed.options.iter().zip(&texts) {
                prop_assert_eq!(option.text.as_str(), text.trim());
            }
        }
    }
}
