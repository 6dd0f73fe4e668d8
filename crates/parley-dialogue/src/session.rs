//! Per-entity conversation state and the request/response cycle.
//!
//! A session is created the first time the player talks to an entity and
//! lives as long as the controller. At most one request is in flight per
//! session; while it is, the current options cannot be selected.

use parley_core::{Entity, EntityId};

use crate::dispatch::{Completion, Dispatcher, RequestId};
use crate::error::{DialogueError, DialogueResult};
use crate::generator::DisplaySink;
use crate::options::OptionSet;
use crate::parser::ResponseParser;
use crate::prompt::PromptBuilder;
use crate::transcript::{Speaker, Transcript};

/// Dialogue state for one entity.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    entity: EntityId,
    name: String,
    persona: String,
    last_utterance: String,
    options: OptionSet,
    in_flight: Option<RequestId>,
    transcript: Transcript,
}

impl ConversationSession {
    /// Start an empty conversation with `entity`.
    pub fn new(entity: &Entity) -> Self {
        Self {
            entity: entity.id,
            name: entity.name.clone(),
            persona: entity.persona().to_string(),
            last_utterance: String::new(),
            options: OptionSet::default(),
            in_flight: None,
            transcript: Transcript::new(),
        }
    }

    /// The entity this session talks to.
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// The entity's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// What the entity said last (empty before the first reply).
    pub fn last_utterance(&self) -> &str {
        &self.last_utterance
    }

    /// The options offered with the last reply.
    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    /// `true` while a reply is being generated.
    pub fn is_awaiting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Everything said so far.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Ask the entity for its next line.
    ///
    /// An empty `player_input` opens the conversation; anything else is what
    /// the player said. Fails with [`DialogueError::Busy`] while a previous
    /// request is still pending.
    pub fn begin(
        &mut self,
        player_input: &str,
        prompts: &PromptBuilder,
        dispatcher: &mut Dispatcher,
        display: &mut dyn DisplaySink,
    ) -> DialogueResult<RequestId> {
        if self.in_flight.is_some() {
            return Err(DialogueError::Busy(self.name.clone()));
        }

        let player_input = player_input.trim();
        let prompt = prompts.build(&self.persona, &self.last_utterance, player_input);
        let request = dispatcher.dispatch(self.entity, prompt);
        self.in_flight = Some(request);

        if player_input.is_empty() {
            display.show(&format!("{} is thinking...", self.name));
        } else {
            self.transcript.record(Speaker::Player, player_input);
            display.show(&format!(
                "You: \"{player_input}\"\n\n{} is thinking...",
                self.name
            ));
        }

        tracing::info!(
            entity = %self.name,
            %request,
            opening = player_input.is_empty(),
            "conversation turn started"
        );
        Ok(request)
    }

    /// Apply a finished request. Returns `false` if it was not the pending one.
    pub fn complete(
        &mut self,
        completion: Completion,
        parser: &dyn ResponseParser,
        display: &mut dyn DisplaySink,
    ) -> bool {
        if self.in_flight != Some(completion.request) {
            tracing::warn!(
                entity = %self.name,
                request = %completion.request,
                "discarding completion for a request that is not pending"
            );
            return false;
        }
        self.in_flight = None;

        match completion.result {
            Ok(raw) => {
                let parsed = parser.parse(&raw);
                tracing::debug!(
                    entity = %self.name,
                    options = parsed.options.len(),
                    degradation = ?parsed.degradation,
                    "reply parsed"
                );

                self.last_utterance = parsed.utterance;
                self.options = parsed.options;
                if !self.last_utterance.is_empty() {
                    self.transcript
                        .record(Speaker::Entity, self.last_utterance.clone());
                }
                display.show(&self.render_reply());
            }
            Err(e) => {
                tracing::warn!(entity = %self.name, error = %e, "generation failed");
                self.transcript.record(Speaker::Failure, e.to_string());
                display.show(&format!(
                    "{} could not answer: {e}\n\nYou can try again.",
                    self.name
                ));
            }
        }
        true
    }

    /// Look up the text of an option. Does not change any state.
    ///
    /// Fails while a request is pending, so a choice can never be made from
    /// options that are about to be replaced.
    pub fn select_option(&self, label: u8) -> DialogueResult<&str> {
        if self.in_flight.is_some() {
            return Err(DialogueError::OptionNotFound(label));
        }
        self.options
            .get(label)
            .ok_or(DialogueError::OptionNotFound(label))
    }

    /// The text shown after a successful reply.
    pub fn render_reply(&self) -> String {
        if self.last_utterance.is_empty() && self.options.is_empty() {
            return format!("{} has nothing to say.", self.name);
        }

        let mut out = if self.last_utterance.is_empty() {
            format!("{} says nothing.", self.name)
        } else {
            format!("{}: {}", self.name, self.last_utterance)
        };
        if self.options.is_empty() {
            out.push_str("\n\n(No replies offered.)");
        } else {
            out.push_str("\n\nHow do you respond?\n");
            out.push_str(&self.options.render());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parley_core::Point;
    use tokio::runtime::Handle;

    use super::*;
    use crate::config::DialogueConfig;
    use crate::convention::Convention;
    use crate::error::GenerationError;
    use crate::parser::MarkerParser;
    use crate::testing::{RecordingDisplay, ScriptedGenerator};

    struct Fixture {
        session: ConversationSession,
        prompts: PromptBuilder,
        parser: MarkerParser,
        dispatcher: Dispatcher,
        display: RecordingDisplay,
        generator: Arc<ScriptedGenerator>,
    }

    impl Fixture {
        fn new(replies: Vec<Result<String, GenerationError>>) -> Self {
            let entity = Entity::new("Hendry", "You are Hendry, a dog.", Point::new(1, 1));
            let generator = Arc::new(ScriptedGenerator::new(replies));
            Self {
                session: ConversationSession::new(&entity),
                prompts: PromptBuilder::new(&DialogueConfig::default(), Convention::default()),
                parser: MarkerParser::default(),
                dispatcher: Dispatcher::new(generator.clone(), Handle::current()),
                display: RecordingDisplay::default(),
                generator,
            }
        }

        fn begin(&mut self, input: &str) -> DialogueResult<RequestId> {
            self.session
                .begin(input, &self.prompts, &mut self.dispatcher, &mut self.display)
        }

        async fn finish(&mut self) -> bool {
            let completion = self.dispatcher.next().await.unwrap();
            self.session
                .complete(completion, &self.parser, &mut self.display)
        }
    }

    const REPLY: &str = "Hello there.\n1. Ask about the stick\n2. Apologize\n3. Walk away";

    #[tokio::test]
    async fn select_before_any_reply_is_not_found() {
        let fx = Fixture::new(vec![]);
        assert!(matches!(
            fx.session.select_option(1),
            Err(DialogueError::OptionNotFound(1))
        ));
    }

    #[tokio::test]
    async fn successful_cycle_replaces_state() {
        let mut fx = Fixture::new(vec![Ok(REPLY.into())]);

        fx.begin("").unwrap();
        assert!(fx.session.is_awaiting());
        assert_eq!(fx.display.last(), "Hendry is thinking...");

        assert!(fx.finish().await);
        assert!(!fx.session.is_awaiting());
        assert_eq!(fx.session.last_utterance(), "Hello there.");
        assert_eq!(fx.session.select_option(2).unwrap(), "Apologize");
        assert!(matches!(
            fx.session.select_option(9),
            Err(DialogueError::OptionNotFound(9))
        ));
        assert!(fx.display.last().contains("[3] Walk away"));
    }

    #[tokio::test]
    async fn second_begin_is_rejected_while_pending() {
        let mut fx = Fixture::new(vec![Ok(REPLY.into()), Ok(REPLY.into())]);

        fx.begin("").unwrap();
        let err = fx.begin("").unwrap_err();
        assert!(matches!(err, DialogueError::Busy(ref name) if name == "Hendry"));
        assert_eq!(fx.dispatcher.in_flight(), 1);

        fx.finish().await;
        assert_eq!(fx.generator.requests().len(), 1);
    }

    #[tokio::test]
    async fn options_are_not_selectable_while_pending() {
        let mut fx = Fixture::new(vec![Ok(REPLY.into()), Ok("Fine.".into())]);
        fx.begin("").unwrap();
        fx.finish().await;

        fx.begin("Apologize").unwrap();
        assert!(fx.session.select_option(1).is_err());
        fx.finish().await;
        assert!(fx.session.options().is_empty());
        assert_eq!(fx.session.last_utterance(), "Fine.");
    }

    #[tokio::test]
    async fn failure_keeps_state_and_allows_retry() {
        let mut fx = Fixture::new(vec![
            Ok(REPLY.into()),
            Err(GenerationError::RequestFailed("timeout".into())),
            Ok("Again?".into()),
        ]);
        fx.begin("").unwrap();
        fx.finish().await;

        fx.begin("Apologize").unwrap();
        fx.finish().await;
        assert!(!fx.session.is_awaiting());
        assert_eq!(fx.session.last_utterance(), "Hello there.");
        assert_eq!(fx.session.select_option(2).unwrap(), "Apologize");
        assert!(fx.display.last().contains("could not answer"));

        assert!(fx.begin("Apologize").is_ok());
        fx.finish().await;
        assert_eq!(fx.session.last_utterance(), "Again?");
    }

    #[tokio::test]
    async fn continuation_prompt_carries_last_utterance() {
        let mut fx = Fixture::new(vec![Ok(REPLY.into()), Ok("Hmph.".into())]);
        fx.begin("").unwrap();
        fx.finish().await;
        fx.begin("Apologize").unwrap();
        fx.finish().await;

        let requests = fx.generator.requests();
        let turn = &requests[1][2].text;
        assert!(turn.contains("You just said to me: \"Hello there.\""));
        assert!(turn.contains("I responded: \"Apologize\""));
    }

    #[tokio::test]
    async fn empty_reply_has_nothing_to_say() {
        let mut fx = Fixture::new(vec![Ok("   ".into())]);
        fx.begin("").unwrap();
        fx.finish().await;
        assert_eq!(fx.display.last(), "Hendry has nothing to say.");
        assert!(fx.session.select_option(1).is_err());
    }

    #[tokio::test]
    async fn unknown_completion_is_discarded() {
        let mut fx = Fixture::new(vec![Ok(REPLY.into())]);
        let stray = Completion {
            entity: fx.session.entity(),
            request: fx.dispatcher.dispatch(fx.session.entity(), fx.prompts.build("", "", "")),
            result: Ok("Ignored.".into()),
        };
        assert!(!fx.session.complete(stray, &fx.parser, &mut fx.display));
        assert_eq!(fx.session.last_utterance(), "");
    }

    #[tokio::test]
    async fn transcript_records_both_sides() {
        let mut fx = Fixture::new(vec![Ok(REPLY.into()), Ok("Good.".into())]);
        fx.begin("").unwrap();
        fx.finish().await;
        fx.begin("Apologize").unwrap();
        fx.finish().await;

        let speakers: Vec<Speaker> = fx
            .session
            .transcript()
            .turns()
            .iter()
            .map(|t| t.speaker)
            .collect();
        assert_eq!(speakers, vec![Speaker::Entity, Speaker::Player, Speaker::Entity]);
    }
}
