//! Test doubles for the generation and display ports.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::generator::{DisplaySink, Generator, Message};

/// Replays a fixed list of results and records every request.
pub(crate) struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, GenerationError>>>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedGenerator {
    pub(crate) fn new(replies: Vec<Result<String, GenerationError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn complete(&self, messages: Vec<Message>) -> Result<String, GenerationError> {
        self.requests.lock().unwrap().push(messages);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::RequestFailed("script exhausted".into())))
    }
}

/// Panics on the first request, then replays its script.
pub(crate) struct PanicOnce {
    panicked: AtomicBool,
    script: ScriptedGenerator,
}

impl PanicOnce {
    pub(crate) fn new(replies: Vec<Result<String, GenerationError>>) -> Self {
        Self {
            panicked: AtomicBool::new(false),
            script: ScriptedGenerator::new(replies),
        }
    }
}

#[async_trait]
impl Generator for PanicOnce {
    async fn complete(&self, messages: Vec<Message>) -> Result<String, GenerationError> {
        if !self.panicked.swap(true, Ordering::SeqCst) {
            panic!("generator blew up");
        }
        self.script.complete(messages).await
    }
}

/// Keeps everything that was shown.
#[derive(Default)]
pub(crate) struct RecordingDisplay {
    pub(crate) shown: Vec<String>,
}

impl RecordingDisplay {
    pub(crate) fn last(&self) -> &str {
        self.shown.last().map(String::as_str).unwrap_or("")
    }
}

impl DisplaySink for RecordingDisplay {
    fn show(&mut self, text: &str) {
        self.shown.push(text.to_string());
    }
}
