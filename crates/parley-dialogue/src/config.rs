//! Configuration for conversations and the interaction controller.

/// Largest option label a digit key can select.
pub const MAX_OPTIONS: u8 = 9;

/// Help shown when the front end does not supply its own.
pub const DEFAULT_HELP: &str = "Walk up to someone and talk to them.\n\
    Pick a reply by its number, or type your own.";

/// Configuration for a game's dialogue engine.
#[derive(Debug, Clone)]
pub struct DialogueConfig {
    /// How many reply options to ask for (1-9).
    pub option_count: u8,
    /// Whether continuation prompts ask for a fresh set of options.
    pub offer_options_on_continuation: bool,
    /// How close (in cells) the player must stand to start a conversation.
    pub interaction_radius: u16,
    /// Text shown for the help input.
    pub help_text: String,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            option_count: 3,
            offer_options_on_continuation: true,
            interaction_radius: 1,
            help_text: DEFAULT_HELP.to_string(),
        }
    }
}

impl DialogueConfig {
    /// Set the number of requested options (clamped to 1-9).
    pub fn with_option_count(mut self, count: u8) -> Self {
        self.option_count = count.clamp(1, MAX_OPTIONS);
        self
    }

    /// Choose whether continuation prompts ask for new options.
    pub fn with_options_on_continuation(mut self, enabled: bool) -> Self {
        self.offer_options_on_continuation = enabled;
        self
    }

    /// Set the interaction radius.
    pub fn with_interaction_radius(mut self, radius: u16) -> Self {
        self.interaction_radius = radius;
        self
    }

    /// Replace the help text.
    pub fn with_help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = text.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = DialogueConfig::default();
        assert_eq!(cfg.option_count, 3);
        assert!(cfg.offer_options_on_continuation);
        assert_eq!(cfg.interaction_radius, 1);
    }

    #[test]
    fn builder_methods() {
        let cfg = DialogueConfig::default()
            .with_option_count(5)
            .with_options_on_continuation(false)
            .with_interaction_radius(2)
            .with_help_text("keys");
        assert_eq!(cfg.option_count, 5);
        assert!(!cfg.offer_options_on_continuation);
        assert_eq!(cfg.interaction_radius, 2);
        assert_eq!(cfg.help_text, "keys");
    }

    #[test]
    fn option_count_clamped() {
        let cfg = DialogueConfig::default().with_option_count(0);
        assert_eq!(cfg.option_count, 1);
        let cfg = DialogueConfig::default().with_option_count(42);
        assert_eq!(cfg.option_count, 9);
    }
}
