//! Running generation requests off the input loop.
//!
//! Each request becomes a task on the tokio runtime. The task sends its
//! result back over a channel; the input loop drains the channel between
//! events and applies completions itself, so conversation state is only
//! ever touched from one place.
//!
//! Every dispatched request yields exactly one completion. A generation
//! call that panics is reported as a failed request.

use std::fmt;
use std::sync::Arc;

use parley_core::EntityId;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::error::GenerationError;
use crate::generator::Generator;
use crate::prompt::PromptRequest;

/// Identifies one generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The outcome of a finished generation task.
#[derive(Debug)]
pub struct Completion {
    /// The entity the request was made for.
    pub entity: EntityId,
    /// The request this completes.
    pub request: RequestId,
    /// Generated text or the failure.
    pub result: Result<String, GenerationError>,
}

/// Spawns generation tasks and collects their completions.
pub struct Dispatcher {
    generator: Arc<dyn Generator>,
    runtime: Handle,
    tx: UnboundedSender<Completion>,
    rx: UnboundedReceiver<Completion>,
    next_id: u64,
    in_flight: usize,
}

impl Dispatcher {
    /// Create a dispatcher that runs `generator` on `runtime`.
    pub fn new(generator: Arc<dyn Generator>, runtime: Handle) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            generator,
            runtime,
            tx,
            rx,
            next_id: 1,
            in_flight: 0,
        }
    }

    /// Start generating a reply. Returns immediately.
    pub fn dispatch(&mut self, entity: EntityId, prompt: PromptRequest) -> RequestId {
        let request = RequestId(self.next_id);
        self.next_id += 1;
        self.in_flight += 1;

        let generator = Arc::clone(&self.generator);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let generation =
                tokio::spawn(async move { generator.complete(prompt.into_messages()).await });
            let result = match generation.await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!(%request, error = %e, "generation task died");
                    Err(GenerationError::RequestFailed(e.to_string()))
                }
            };
            let completion = Completion {
                entity,
                request,
                result,
            };
            if tx.send(completion).is_err() {
                tracing::debug!(%request, "completion dropped, receiver is gone");
            }
        });

        tracing::debug!(%request, %entity, "dispatched generation request");
        request
    }

    /// Take a finished completion without waiting.
    pub fn try_next(&mut self) -> Option<Completion> {
        let completion = self.rx.try_recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(completion)
    }

    /// Wait for the next completion. Returns `None` when nothing is in flight.
    pub async fn next(&mut self) -> Option<Completion> {
        if self.in_flight == 0 {
            return None;
        }
        let completion = self.rx.recv().await?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(completion)
    }

    /// Requests dispatched whose completions were not collected yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}
