//! Prompt construction from persona, the previous turn, and player input.

use crate::config::DialogueConfig;
use crate::convention::Convention;
use crate::generator::Message;

const FRAMING: &str = "You are writing dialogue for an interactive text adventure. \
    Stay in character as the person described to you and speak directly to the player, \
    who is addressed as \"me\".";

/// A built prompt, ready to be consumed by one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    messages: Vec<Message>,
}

impl PromptRequest {
    /// The messages in send order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Hand the messages over to a generation call.
    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}

/// Whether a prompt opens a conversation or continues one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// No player input yet: ask for an opening line.
    Opening,
    /// The player said something: ask for a response.
    Continuation,
}

/// Builds prompts. Pure: the same inputs always give the same request.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    convention: Convention,
    option_count: u8,
    options_on_continuation: bool,
}

impl PromptBuilder {
    /// Create a builder for the given configuration and convention.
    pub fn new(config: &DialogueConfig, convention: Convention) -> Self {
        Self {
            convention,
            option_count: config.option_count,
            options_on_continuation: config.offer_options_on_continuation,
        }
    }

    /// Which kind of prompt `player_input` produces.
    pub fn kind(player_input: &str) -> PromptKind {
        if player_input.trim().is_empty() {
            PromptKind::Opening
        } else {
            PromptKind::Continuation
        }
    }

    /// Build the prompt for one turn.
    ///
    /// Messages are: system framing with the option convention, the persona,
    /// then the turn text.
    pub fn build(&self, persona: &str, last_utterance: &str, player_input: &str) -> PromptRequest {
        let system = format!(
            "{FRAMING}\n{}",
            self.convention.instructions(self.option_count)
        );
        let turn = match Self::kind(player_input) {
            PromptKind::Opening => self.opening_turn(),
            PromptKind::Continuation => self.continuation_turn(last_utterance, player_input.trim()),
        };

        PromptRequest {
            messages: vec![
                Message::system(system),
                Message::user(strip_indentation(persona)),
                Message::user(turn),
            ],
        }
    }

    fn opening_turn(&self) -> String {
        format!(
            "What do you say to me?\n\n\
             And what are {} VERY DIFFERENT ways in which I can respond?",
            self.option_count_words()
        )
    }

    fn continuation_turn(&self, last_utterance: &str, player_input: &str) -> String {
        let mut turn = String::new();
        let last_utterance = last_utterance.trim();
        if !last_utterance.is_empty() {
            turn.push_str(&format!("You just said to me: \"{last_utterance}\".\n\n"));
        }
        turn.push_str(&format!(
            "I responded: \"{player_input}\". How do you respond back?"
        ));
        if self.options_on_continuation {
            turn.push_str(&format!(
                "\n\nWhat are {} VERY DIFFERENT ways in which I can respond to your response?",
                self.option_count_words()
            ));
        }
        turn
    }

    fn option_count_words(&self) -> String {
        match self.option_count {
            1 => "one".to_string(),
            2 => "two".to_string(),
            3 => "three".to_string(),
            4 => "four".to_string(),
            5 => "five".to_string(),
            n => n.to_string(),
        }
    }
}

/// Trim every line of template or persona text.
fn strip_indentation(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
