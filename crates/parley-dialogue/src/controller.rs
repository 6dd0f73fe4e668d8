//! The input-driven state machine that ties the world to conversations.
//!
//! One [`InteractionController`] is the whole game context: it owns the
//! world, every conversation session, the dispatcher for generation tasks,
//! and the display. Front ends translate key presses into [`Input`] values,
//! feed them to [`InteractionController::handle`], and call
//! [`InteractionController::poll_completions`] between events.

use std::collections::HashMap;

use parley_core::{Direction, EntityId, WorldState};

use crate::config::DialogueConfig;
use crate::convention::Convention;
use crate::dispatch::{Completion, Dispatcher};
use crate::generator::DisplaySink;
use crate::parser::{MarkerParser, ResponseParser};
use crate::prompt::PromptBuilder;
use crate::session::ConversationSession;

/// A discrete player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Walk in a direction.
    Move {
        /// Where to walk.
        direction: Direction,
        /// How many cells.
        steps: u16,
    },
    /// Talk to whoever is closest.
    Confirm,
    /// Pick a reply option by label.
    Digit(u8),
    /// Say something in free text.
    Reply(String),
    /// Show the active conversation so far.
    ShowTranscript,
    /// Show the help text.
    Help,
    /// Leave the game.
    Quit,
}

/// Whether the game keeps running after an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading input.
    Continue,
    /// Stop the loop.
    Quit,
}

/// State of the active conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    /// Nothing is pending for the active entity (or nobody is active).
    Idle,
    /// A reply is being generated for this entity.
    AwaitingGeneration(EntityId),
}

/// Routes player input to the world and to conversation sessions.
pub struct InteractionController<D: DisplaySink> {
    world: WorldState,
    sessions: HashMap<EntityId, ConversationSession>,
    active: Option<EntityId>,
    config: DialogueConfig,
    prompts: PromptBuilder,
    parser: Box<dyn ResponseParser>,
    dispatcher: Dispatcher,
    display: D,
    quit: bool,
}

impl<D: DisplaySink> InteractionController<D> {
    /// Create a controller using the default reply convention.
    pub fn new(
        world: WorldState,
        config: DialogueConfig,
        dispatcher: Dispatcher,
        display: D,
    ) -> Self {
        let convention = Convention::default();
        Self {
            world,
            sessions: HashMap::new(),
            active: None,
            prompts: PromptBuilder::new(&config, convention.clone()),
            parser: Box::new(MarkerParser::new(convention)),
            config,
            dispatcher,
            display,
            quit: false,
        }
    }

    /// Use a different convention for both prompts and parsing.
    pub fn with_convention(mut self, convention: Convention) -> Self {
        self.prompts = PromptBuilder::new(&self.config, convention.clone());
        self.parser = Box::new(MarkerParser::new(convention));
        self
    }

    /// Replace the reply parser.
    pub fn with_parser(mut self, parser: impl ResponseParser + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    /// Apply one input.
    pub fn handle(&mut self, input: Input) -> Flow {
        if self.quit {
            return Flow::Quit;
        }

        match input {
            Input::Move { direction, steps } => {
                let at = self.world.move_player(direction, steps);
                tracing::trace!(?direction, steps, %at, "player moved");
            }
            Input::Confirm => self.confirm(),
            Input::Digit(label) => self.choose(label),
            Input::Reply(text) => self.reply(&text),
            Input::ShowTranscript => self.show_transcript(),
            Input::Help => self.display.show(&self.config.help_text),
            Input::Quit => {
                tracing::info!(pending = self.dispatcher.in_flight(), "quitting");
                self.quit = true;
                return Flow::Quit;
            }
        }
        Flow::Continue
    }

    /// Apply every completion that has arrived. Never blocks.
    ///
    /// Returns how many completions were applied.
    pub fn poll_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Some(completion) = self.dispatcher.try_next() {
            if self.apply(completion) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the next completion and apply it.
    ///
    /// Returns `false` if nothing was in flight or the completion was stale.
    pub async fn wait_for_completion(&mut self) -> bool {
        match self.dispatcher.next().await {
            Some(completion) => self.apply(completion),
            None => false,
        }
    }

    /// State of the active conversation.
    pub fn state(&self) -> InteractionState {
        match self.active_session() {
            Some(session) if session.is_awaiting() => {
                InteractionState::AwaitingGeneration(session.entity())
            }
            _ => InteractionState::Idle,
        }
    }

    /// The world.
    pub fn world(&self) -> &WorldState {
        &self.world
    }

    /// The display.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Mutable access to the display, for front-end-only actions like scrolling.
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// The dialogue configuration.
    pub fn config(&self) -> &DialogueConfig {
        &self.config
    }

    /// The session with `entity`, if the player ever talked to it.
    pub fn session(&self, entity: EntityId) -> Option<&ConversationSession> {
        self.sessions.get(&entity)
    }

    /// The entity digit keys and replies currently address.
    pub fn active_entity(&self) -> Option<EntityId> {
        self.active
    }

    /// Generation requests still running.
    pub fn pending(&self) -> usize {
        self.dispatcher.in_flight()
    }

    /// `true` once [`Input::Quit`] was handled.
    pub fn has_quit(&self) -> bool {
        self.quit
    }

    fn active_session(&self) -> Option<&ConversationSession> {
        self.active.and_then(|id| self.sessions.get(&id))
    }

    fn confirm(&mut self) {
        let radius = self.config.interaction_radius;
        let nearby: Vec<EntityId> = self
            .world
            .entities_near_player(radius)
            .iter()
            .map(|e| e.id)
            .collect();
        if nearby.is_empty() {
            self.display.show("There is nobody close enough to talk to.");
            return;
        }

        let free = nearby.into_iter().find(|id| {
            self.sessions
                .get(id)
                .is_none_or(|session| !session.is_awaiting())
        });
        match free {
            Some(entity) => self.begin(entity, ""),
            None => tracing::debug!("confirm ignored, everyone nearby is still thinking"),
        }
    }

    fn choose(&mut self, label: u8) {
        let Some(session) = self.active_session() else {
            self.display.show("Nobody is listening.");
            return;
        };
        if session.is_awaiting() {
            tracing::debug!(
                label,
                entity = session.name(),
                "option ignored while awaiting a reply"
            );
            return;
        }
        if session.options().is_empty() {
            self.display.show("There are no replies to choose from.");
            return;
        }

        let entity = session.entity();
        match session.select_option(label) {
            Ok(text) => {
                let text = text.to_string();
                self.say(entity, &text);
            }
            Err(e) => {
                tracing::debug!(error = %e, "option lookup missed");
                self.display.show(&format!("No such option: {label}"));
            }
        }
    }

    fn reply(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let Some(session) = self.active_session() else {
            self.display.show("Nobody is listening.");
            return;
        };
        if session.is_awaiting() {
            tracing::debug!(entity = session.name(), "reply ignored while awaiting a reply");
            return;
        }
        let entity = session.entity();
        self.say(entity, text);
    }

    fn say(&mut self, entity: EntityId, text: &str) {
        self.world.player_mut().say(text);
        self.begin(entity, text);
    }

    fn begin(&mut self, entity: EntityId, player_input: &str) {
        if !self.sessions.contains_key(&entity) {
            let Some(found) = self.world.get_entity(entity) else {
                tracing::warn!(%entity, "cannot talk to an entity that is not in the world");
                return;
            };
            tracing::debug!(%entity, name = %found.name, "new conversation");
            self.sessions.insert(entity, ConversationSession::new(found));
        }
        let Some(session) = self.sessions.get_mut(&entity) else {
            return;
        };

        match session.begin(
            player_input,
            &self.prompts,
            &mut self.dispatcher,
            &mut self.display,
        ) {
            Ok(_) => self.active = Some(entity),
            Err(e) => tracing::debug!(error = %e, "turn not started"),
        }
    }

    fn apply(&mut self, completion: Completion) -> bool {
        let entity = completion.entity;
        let Some(session) = self.sessions.get_mut(&entity) else {
            tracing::warn!(
                %entity,
                request = %completion.request,
                "completion for an unknown session"
            );
            return false;
        };

        let applied = session.complete(completion, self.parser.as_ref(), &mut self.display);
        if applied && self.active != Some(entity) {
            tracing::debug!(%entity, "switching conversation to the entity that just answered");
            self.active = Some(entity);
        }
        applied
    }

    fn show_transcript(&mut self) {
        let Some(session) = self.active_session() else {
            self.display.show("Nobody is listening.");
            return;
        };
        let text = if session.transcript().is_empty() {
            format!("Nothing has been said to {} yet.", session.name())
        } else {
            format!(
                "Conversation with {}\n\n{}",
                session.name(),
                session.transcript().render(session.name())
            )
        };
        self.display.show(&text);
    }
}
