//! Scriptable in-memory `TextGenerator` for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{LlmError, TextGenerator};

type Reply = Box<dyn Fn(&str, &str) -> Result<String, LlmError> + Send + Sync>;

pub struct FakeGenerator {
    reply: Reply,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    /// Answers every call with the prompt it was given.
    pub fn echo() -> Self {
        Self::with_reply(|_, prompt| Ok(prompt.to_string()))
    }

    pub fn with_reply<F>(reply: F) -> Self
    where
        F: Fn(&str, &str) -> Result<String, LlmError> + Send + Sync + 'static,
    {
        Self {
            reply: Box::new(reply),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        (self.reply)(system, prompt)
    }
}
